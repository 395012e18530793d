use pg_connector::ConnectionParams;

#[test]
fn all_six_fields_in_fixed_order() {
    let params = ConnectionParams::new()
        .host("db1")
        .port("5432")
        .dbname("app")
        .user("svc")
        .password("plain123")
        .sslmode("disable");

    assert_eq!(
        params.descriptor(None),
        "host=db1 port=5432 dbname=app user=svc password=plain123 sslmode=disable"
    );
}

#[test]
fn omitted_fields_contribute_no_token() {
    let params = ConnectionParams::new().host("db1").dbname("app");
    assert_eq!(params.descriptor(None), "host=db1 dbname=app");

    let params = ConnectionParams::new().user("svc");
    assert_eq!(params.descriptor(None), "user=svc");

    assert_eq!(ConnectionParams::new().descriptor(None), "");
}

#[test]
fn empty_strings_are_treated_as_absent() {
    let params = ConnectionParams::new()
        .host("")
        .port("5432")
        .dbname("app")
        .password("");
    assert_eq!(params.descriptor(None), "port=5432 dbname=app");
}

#[test]
fn order_is_independent_of_setter_order() {
    let params = ConnectionParams::new()
        .sslmode("require")
        .user("svc")
        .host("db1");
    assert_eq!(params.descriptor(None), "host=db1 user=svc sslmode=require");
}

#[test]
fn resolved_password_replaces_raw_field() {
    let params = ConnectionParams::new()
        .host("db1")
        .password("/etc/secrets/db.key");
    assert_eq!(
        params.descriptor(Some("s3cret")),
        "host=db1 password=s3cret"
    );
}

#[test]
fn exactly_one_token_per_supplied_field() {
    // every non-empty subset of two representative fields plus spot checks
    let params = ConnectionParams::new().host("h").sslmode("s");
    let descriptor = params.descriptor(None);
    let tokens: Vec<&str> = descriptor.split(' ').collect();
    assert_eq!(tokens, vec!["host=h", "sslmode=s"]);

    let params = ConnectionParams::new()
        .port("1")
        .user("u")
        .password("p");
    let descriptor = params.descriptor(None);
    let tokens: Vec<&str> = descriptor.split(' ').collect();
    assert_eq!(tokens, vec!["port=1", "user=u", "password=p"]);
}

#[test]
fn params_deserialize_from_config_section() {
    let params: ConnectionParams = serde_json::from_str(
        r#"{"host":"db1","port":"5432","dbname":"app","user":"svc"}"#,
    )
    .unwrap();
    assert_eq!(params.host.as_deref(), Some("db1"));
    assert_eq!(params.password, None);
    assert_eq!(
        params.descriptor(None),
        "host=db1 port=5432 dbname=app user=svc"
    );
}

use std::path::Path;
use std::sync::Mutex;

use pg_connector::{
    ConnectionParams, PgConnector, PgConnectorError, SecretError, SecretResolver, SecretsConfig,
};

#[derive(Default)]
struct RecordingResolver {
    calls: Mutex<Vec<String>>,
    fail: bool,
}

impl SecretResolver for RecordingResolver {
    fn resolve_from_file(&self, path: &Path) -> Result<String, SecretError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("file:{}", path.display()));
        if self.fail {
            return Err("lookup failed".into());
        }
        Ok("resolved-file-secret".to_string())
    }

    fn resolve_from_reference(&self, reference: &str) -> Result<String, SecretError> {
        self.calls.lock().unwrap().push(format!("ref:{reference}"));
        if self.fail {
            return Err("lookup failed".into());
        }
        Ok("resolved-ref-secret".to_string())
    }
}

fn unreachable_params() -> ConnectionParams {
    // port 1 on loopback: connection is refused immediately, which is all
    // these tests need after the resolution step has run
    ConnectionParams::new()
        .host("127.0.0.1")
        .port("1")
        .dbname("app")
        .user("svc")
}

#[tokio::test]
async fn key_password_without_secrets_section_is_config_error() {
    let params = unreachable_params().password("/etc/secrets/db.key");
    let err = PgConnector::connect(params, None).await.unwrap_err();
    assert!(matches!(err, PgConnectorError::ConfigError(_)), "{err}");
}

#[tokio::test]
async fn failed_file_lookup_fails_construction_with_secret_error() {
    let resolver = RecordingResolver {
        fail: true,
        ..RecordingResolver::default()
    };
    let params = unreachable_params().password("/etc/secrets/db.key");
    let err = PgConnector::connect_with_resolver(params, Some(&resolver))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PgConnectorError::SecretResolution { ref reference, .. }
            if reference == "/etc/secrets/db.key"
    ));
    assert_eq!(
        *resolver.calls.lock().unwrap(),
        vec!["file:/etc/secrets/db.key".to_string()]
    );
}

#[tokio::test]
async fn non_key_password_routes_to_reference_lookup() {
    let resolver = RecordingResolver {
        fail: true,
        ..RecordingResolver::default()
    };
    let params = unreachable_params().password("prod-db-alias");
    let err = PgConnector::connect_with_resolver(params, Some(&resolver))
        .await
        .unwrap_err();

    assert!(matches!(err, PgConnectorError::SecretResolution { .. }));
    assert_eq!(
        *resolver.calls.lock().unwrap(),
        vec!["ref:prod-db-alias".to_string()]
    );
}

#[tokio::test]
async fn empty_password_never_calls_the_resolver() {
    let resolver = RecordingResolver::default();
    let params = unreachable_params().password("");
    let err = PgConnector::connect_with_resolver(params, Some(&resolver))
        .await
        .unwrap_err();

    // resolution was skipped; the failure comes from the connection attempt
    assert!(matches!(err, PgConnectorError::ConnectionError { .. }));
    assert!(resolver.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn literal_password_without_secrets_section_connects_unresolved() {
    let params = unreachable_params().password("plain123");
    let err = PgConnector::connect(params, None).await.unwrap_err();

    // a literal password needs no resolution, so construction proceeds all
    // the way to the (refused) connection attempt
    assert!(matches!(err, PgConnectorError::ConnectionError { .. }), "{err}");
}

#[tokio::test]
async fn secrets_section_backs_key_file_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("db.key");
    std::fs::write(&key_path, "wrong-password-on-purpose\n").unwrap();

    let secrets = SecretsConfig {
        dir: dir.path().to_path_buf(),
    };
    let params = unreachable_params().password(key_path.display().to_string());
    let err = PgConnector::connect(params, Some(&secrets))
        .await
        .unwrap_err();

    // the file was readable, so resolution succeeded and the failure is the
    // refused connection, not a secret error
    assert!(matches!(err, PgConnectorError::ConnectionError { .. }), "{err}");
}

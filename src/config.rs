use serde::Deserialize;

/// Discrete connection fields for a PostgreSQL session.
///
/// All fields are optional; absent or empty fields are simply omitted from
/// the generated descriptor rather than defaulted. The struct deserializes
/// directly from a configuration-file section:
///
/// ```rust
/// use pg_connector::ConnectionParams;
///
/// let params: ConnectionParams =
///     serde_json::from_str(r#"{"host":"db1","dbname":"app"}"#).unwrap();
/// assert_eq!(params.descriptor(None), "host=db1 dbname=app");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionParams {
    pub host: Option<String>,
    pub port: Option<String>,
    pub dbname: Option<String>,
    pub user: Option<String>,
    /// Literal password, `*.key` file path, or opaque secret reference.
    pub password: Option<String>,
    pub sslmode: Option<String>,
}

impl ConnectionParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    #[must_use]
    pub fn dbname(mut self, dbname: impl Into<String>) -> Self {
        self.dbname = Some(dbname.into());
        self
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn sslmode(mut self, sslmode: impl Into<String>) -> Self {
        self.sslmode = Some(sslmode.into());
        self
    }

    /// Assemble the libpq-style connection descriptor.
    ///
    /// Emits one `key=value` token per non-empty field, space-delimited, in
    /// the fixed order host, port, dbname, user, password, sslmode. The
    /// token order and the skip-when-empty policy are what the driver's
    /// descriptor parser expects; do not reorder.
    ///
    /// `resolved_password`, when given, replaces the raw `password` field
    /// (the caller has already run secret resolution on it).
    #[must_use]
    pub fn descriptor(&self, resolved_password: Option<&str>) -> String {
        let password = resolved_password.or(self.password.as_deref());
        let fields = [
            ("host", self.host.as_deref()),
            ("port", self.port.as_deref()),
            ("dbname", self.dbname.as_deref()),
            ("user", self.user.as_deref()),
            ("password", password),
            ("sslmode", self.sslmode.as_deref()),
        ];

        let mut tokens = Vec::with_capacity(fields.len());
        for (key, value) in fields {
            if let Some(value) = value {
                if !value.is_empty() {
                    tokens.push(format!("{key}={value}"));
                }
            }
        }
        tokens.join(" ")
    }
}

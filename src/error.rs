use thiserror::Error;

/// Errors surfaced by the connector.
///
/// Every failure is returned synchronously from the call that triggered it;
/// there is no retry, recovery, or deferred error channel in this layer.
#[derive(Debug, Error)]
pub enum PgConnectorError {
    /// The supplied configuration cannot produce a usable connection
    /// descriptor (e.g. a secret reference with no secrets section).
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A file- or reference-backed password lookup failed.
    #[error("Secret resolution error for {reference:?}: {source}")]
    SecretResolution {
        reference: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Opening the session or the post-open health check failed.
    #[error("Connection error during {context}: {source}")]
    ConnectionError {
        context: &'static str,
        #[source]
        source: tokio_postgres::Error,
    },

    /// Statement preparation or execution failed.
    #[error("Query error during {context}: {source}")]
    QueryError {
        context: &'static str,
        #[source]
        source: tokio_postgres::Error,
    },

    /// A column of a fetched row could not be decoded.
    #[error("Row decode error at column {column}: {source}")]
    RowDecode {
        column: usize,
        #[source]
        source: tokio_postgres::Error,
    },

    /// Releasing the session reported a failure from the driver task.
    #[error("Close error: {source}")]
    CloseError {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An operation was attempted after `close`.
    #[error("Connection is closed")]
    ClosedHandle,
}

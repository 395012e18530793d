//! Minimal async PostgreSQL connector.
//!
//! Builds a libpq-style connection descriptor from discrete optional fields,
//! optionally resolves the password through a secret store (file-backed
//! `*.key` references or opaque lookup references), opens and health-checks
//! one session, and exposes a single generic operation: run arbitrary SQL
//! text and materialize every row into dynamically-typed values.
//!
//! ```rust,no_run
//! use pg_connector::{ConnectionParams, PgConnector};
//!
//! # async fn demo() -> Result<(), pg_connector::PgConnectorError> {
//! let params = ConnectionParams::new()
//!     .host("db1")
//!     .port("5432")
//!     .dbname("app")
//!     .user("svc")
//!     .password("plain123")
//!     .sslmode("disable");
//!
//! let mut db = PgConnector::connect(params, None).await?;
//! let result = db.run("SELECT id, name FROM users").await?;
//! for row in &result {
//!     println!("{:?} {:?}", row.get("id"), row.get("name"));
//! }
//! db.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! Deliberately out of scope: query building, parameter binding, pooling,
//! transactions, streaming cursors, and retries. The driver's own
//! guarantees (pipelined concurrent queries on one session) are inherited,
//! not reimplemented.

pub mod config;
pub mod connector;
pub mod error;
mod query;
pub mod results;
pub mod secrets;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use config::ConnectionParams;
pub use connector::PgConnector;
pub use error::PgConnectorError;
pub use results::{DbRow, ResultSet};
pub use secrets::{SecretError, SecretResolver, SecretStore, SecretsConfig};
pub use types::RowValues;

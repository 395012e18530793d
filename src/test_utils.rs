//! Embedded-PostgreSQL helpers for tests and examples.
//!
//! Gated behind the `test-utils` feature so the bundled server binaries are
//! only pulled in when a live database is actually wanted.

use postgresql_embedded::PostgreSQL;

use crate::config::ConnectionParams;

/// A running embedded PostgreSQL instance plus parameters that reach it.
pub struct EmbeddedPostgres {
    postgresql: PostgreSQL,
    /// Parameters pointing at the embedded server, password as a literal.
    pub params: ConnectionParams,
}

/// Set up an embedded PostgreSQL instance and create `dbname` on it.
///
/// # Errors
/// Returns an error if the embedded server cannot be set up or started, or
/// if database creation fails.
pub async fn setup_postgres_embedded(
    dbname: &str,
) -> Result<EmbeddedPostgres, Box<dyn std::error::Error + Send + Sync>> {
    let mut postgresql = PostgreSQL::default();
    postgresql.setup().await?;
    postgresql.start().await?;
    postgresql.create_database(dbname).await?;

    let settings = postgresql.settings();
    let params = ConnectionParams::new()
        .host(settings.host.clone())
        .port(settings.port.to_string())
        .dbname(dbname)
        .user(settings.username.clone())
        .password(settings.password.clone())
        .sslmode("disable");

    Ok(EmbeddedPostgres { postgresql, params })
}

/// Stop the embedded server.
///
/// # Errors
/// Returns an error if shutdown fails.
pub async fn stop_postgres_embedded(
    mut embedded: EmbeddedPostgres,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    embedded.postgresql.stop().await?;
    Ok(())
}

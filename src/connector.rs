use std::path::Path;

use tokio::task::JoinHandle;
use tokio_postgres::{Client, Config, NoTls};
use tracing::debug;

use crate::config::ConnectionParams;
use crate::error::PgConnectorError;
use crate::query::build_result_set;
use crate::results::ResultSet;
use crate::secrets::{SecretResolver, SecretStore, SecretsConfig, is_file_reference};

/// One owned PostgreSQL session.
///
/// Created by [`connect`], which resolves the password, opens the session,
/// and health-checks it before handing it out; the handle is never usable
/// before that sequence succeeds. `run` takes `&self` and may be invoked
/// concurrently from multiple callers (the driver pipelines queries on the
/// session); `close` takes `&mut self`, so the borrow checker rules out
/// closing while a query is in flight.
///
/// No cancellation or timeout is built in; wrap calls in
/// `tokio::time::timeout` when a deadline is needed.
///
/// [`connect`]: PgConnector::connect
#[derive(Debug)]
pub struct PgConnector {
    params: ConnectionParams,
    client: Option<Client>,
    connection_task: Option<JoinHandle<Result<(), tokio_postgres::Error>>>,
}

impl PgConnector {
    /// Open a session from discrete parameters and an optional secrets
    /// section.
    ///
    /// The built-in [`SecretStore`] is constructed lazily, only when a
    /// non-empty password is actually present; a secrets section paired
    /// with password-less parameters is never touched.
    ///
    /// # Errors
    /// - [`PgConnectorError::ConfigError`] if the password is a `*.key`
    ///   reference but `secrets` is `None`, or the assembled descriptor is
    ///   rejected by the driver.
    /// - [`PgConnectorError::SecretResolution`] if the secret lookup fails.
    /// - [`PgConnectorError::ConnectionError`] if opening the session or the
    ///   health check fails. No handle is left allocated on failure.
    pub async fn connect(
        params: ConnectionParams,
        secrets: Option<&SecretsConfig>,
    ) -> Result<Self, PgConnectorError> {
        let store;
        let resolver: Option<&dyn SecretResolver> = match (params.password.as_deref(), secrets) {
            (Some(password), Some(config)) if !password.is_empty() => {
                store = SecretStore::from_config(config);
                Some(&store)
            }
            _ => None,
        };
        Self::connect_with_resolver(params, resolver).await
    }

    /// Like [`connect`], but with a caller-supplied secret resolver (e.g. a
    /// decrypting or vault-backed store).
    ///
    /// # Errors
    /// Same contract as [`connect`].
    ///
    /// [`connect`]: PgConnector::connect
    pub async fn connect_with_resolver(
        params: ConnectionParams,
        resolver: Option<&dyn SecretResolver>,
    ) -> Result<Self, PgConnectorError> {
        let password = resolve_password(params.password.as_deref(), resolver)?;
        let descriptor = params.descriptor(password.as_deref());

        let config: Config = descriptor.parse().map_err(|e: tokio_postgres::Error| {
            PgConnectorError::ConfigError(format!("invalid connection descriptor: {e}"))
        })?;

        debug!(
            host = params.host.as_deref(),
            port = params.port.as_deref(),
            dbname = params.dbname.as_deref(),
            user = params.user.as_deref(),
            "opening postgres session"
        );

        let (client, connection) =
            config
                .connect(NoTls)
                .await
                .map_err(|source| PgConnectorError::ConnectionError {
                    context: "connect",
                    source,
                })?;
        let connection_task = tokio::spawn(connection);

        // Health check before handing the session out. On failure the client
        // is dropped, which terminates the driver task; nothing leaks.
        if let Err(source) = client.simple_query("SELECT 1").await {
            drop(client);
            connection_task.abort();
            return Err(PgConnectorError::ConnectionError {
                context: "ping",
                source,
            });
        }

        Ok(Self {
            params,
            client: Some(client),
            connection_task: Some(connection_task),
        })
    }

    /// The parameters this session was opened with.
    #[must_use]
    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.client.is_none()
    }

    /// Execute arbitrary SQL text and materialize every row in memory.
    ///
    /// No parameterization or escaping happens here; injection safety is the
    /// caller's responsibility. The full result set is buffered (no size
    /// bound); zero matching rows yield an empty set, not an error. No retry
    /// is attempted on failure.
    ///
    /// # Errors
    /// - [`PgConnectorError::ClosedHandle`] after [`close`]; the released
    ///   session is never touched.
    /// - [`PgConnectorError::QueryError`] if preparation (which also supplies
    ///   the column metadata) or execution fails.
    /// - [`PgConnectorError::RowDecode`] if a fetched column fails to decode.
    ///
    /// [`close`]: PgConnector::close
    pub async fn run(&self, sql: &str) -> Result<ResultSet, PgConnectorError> {
        let client = self.client.as_ref().ok_or(PgConnectorError::ClosedHandle)?;

        let stmt = client
            .prepare(sql)
            .await
            .map_err(|source| PgConnectorError::QueryError {
                context: "prepare",
                source,
            })?;
        let rows = client.query(&stmt, &[]).await.map_err(|source| {
            PgConnectorError::QueryError {
                context: "execute",
                source,
            }
        })?;

        debug!(
            rows = rows.len(),
            columns = stmt.columns().len(),
            "materialized result set"
        );
        build_result_set(&stmt, &rows)
    }

    /// Release the session.
    ///
    /// Drops the client and waits for the driver task to wind down,
    /// surfacing its failure rather than swallowing it. Exclusive borrow
    /// means no query can be in flight when this runs.
    ///
    /// # Errors
    /// - [`PgConnectorError::ClosedHandle`] if already closed.
    /// - [`PgConnectorError::CloseError`] if the driver task reported a
    ///   failure while shutting down.
    pub async fn close(&mut self) -> Result<(), PgConnectorError> {
        let client = self.client.take().ok_or(PgConnectorError::ClosedHandle)?;
        let connection_task = self.connection_task.take();
        drop(client);

        if let Some(task) = connection_task {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(source)) => {
                    return Err(PgConnectorError::CloseError {
                        source: Box::new(source),
                    });
                }
                Err(join_error) if join_error.is_cancelled() => {}
                Err(join_error) => {
                    return Err(PgConnectorError::CloseError {
                        source: Box::new(join_error),
                    });
                }
            }
        }

        debug!("postgres session closed");
        Ok(())
    }
}

/// Apply the password routing policy.
///
/// - empty or absent password: no resolution call at all;
/// - `*.key` suffix: file-backed resolution of that path (a missing resolver
///   is a configuration error, since resolution is required);
/// - anything else: string-backed resolution when a resolver is present,
///   otherwise the value is used literally.
fn resolve_password(
    password: Option<&str>,
    resolver: Option<&dyn SecretResolver>,
) -> Result<Option<String>, PgConnectorError> {
    let Some(password) = password else {
        return Ok(None);
    };
    if password.is_empty() {
        return Ok(None);
    }

    if is_file_reference(password) {
        let Some(resolver) = resolver else {
            return Err(PgConnectorError::ConfigError(format!(
                "password {password:?} is a file-backed secret reference but no secrets section is configured"
            )));
        };
        return resolver
            .resolve_from_file(Path::new(password))
            .map(Some)
            .map_err(|source| PgConnectorError::SecretResolution {
                reference: password.to_string(),
                source,
            });
    }

    match resolver {
        Some(resolver) => resolver
            .resolve_from_reference(password)
            .map(Some)
            .map_err(|source| PgConnectorError::SecretResolution {
                reference: password.to_string(),
                source,
            }),
        None => Ok(Some(password.to_string())),
    }
}

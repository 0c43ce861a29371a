//! MS SQL Server connection using tiberius

use std::sync::atomic::{AtomicBool, Ordering};
use tiberius::{AuthMethod, Client, Config, EncryptionLevel, Row, ToSql};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use crate::config::ConnectionConfig;

/// MS SQL Server connection errors
#[derive(Debug, thiserror::Error)]
pub enum MssqlError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    #[error("Unexpected column value: {0}")]
    TypeConversion(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection is closed")]
    ConnectionClosed,

    #[error("Tiberius error: {0}")]
    Tiberius(#[from] tiberius::error::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// MS SQL Server connection.
///
/// The client is shared behind a mutex, so concurrent metadata fetches are
/// serialized on the wire.
pub struct MssqlConnection {
    client: Mutex<Client<Compat<TcpStream>>>,
    closed: AtomicBool,
    database: Option<String>,
}

impl MssqlConnection {
    /// Open a connection described by `config`
    #[tracing::instrument(skip(config), fields(host = %config.host, port = config.port_or_default()))]
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, MssqlError> {
        let port = config.port_or_default();
        tracing::debug!("connecting to MS SQL Server at {}:{}", config.host, port);

        let mut tiberius_config = Config::new();
        tiberius_config.host(&config.host);
        tiberius_config.port(port);

        if let Some(db) = &config.database {
            tiberius_config.database(db);
        }

        if config.trusts_server_certificate() {
            tiberius_config.trust_cert();
        }

        tiberius_config.encryption(if config.encryption_required() {
            EncryptionLevel::Required
        } else {
            EncryptionLevel::Off
        });

        match (&config.user, &config.password) {
            (Some(user), Some(pass)) => {
                tiberius_config.authentication(AuthMethod::sql_server(user, pass));
            }
            (Some(user), None) => {
                tiberius_config.authentication(AuthMethod::sql_server(user, ""));
            }
            (None, _) => {
                #[cfg(windows)]
                {
                    tiberius_config.authentication(AuthMethod::Integrated);
                }
                #[cfg(not(windows))]
                {
                    return Err(MssqlError::AuthenticationFailed(
                        "Windows authentication is only supported on Windows".to_string(),
                    ));
                }
            }
        }

        let tcp = TcpStream::connect(tiberius_config.get_addr())
            .await
            .map_err(|e| MssqlError::ConnectionFailed(e.to_string()))?;

        tcp.set_nodelay(true)?;
        let compat_stream = tcp.compat_write();

        let client = Client::connect(tiberius_config, compat_stream)
            .await
            .map_err(|e| MssqlError::ConnectionFailed(e.to_string()))?;

        tracing::debug!("successfully connected to MS SQL Server");

        Ok(Self {
            client: Mutex::new(client),
            closed: AtomicBool::new(false),
            database: config.database.clone(),
        })
    }

    fn ensure_not_closed(&self) -> Result<(), MssqlError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(MssqlError::ConnectionClosed);
        }
        Ok(())
    }

    /// Run a query and return the rows of its first result set
    pub(crate) async fn query_rows(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
    ) -> Result<Vec<Row>, MssqlError> {
        self.ensure_not_closed()?;
        let start = std::time::Instant::now();

        let mut client = self.client.lock().await;

        let rows = client
            .query(sql, params)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "query failed");
                MssqlError::QueryFailed(e.to_string())
            })?
            .into_first_result()
            .await?;

        tracing::debug!(
            row_count = rows.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "query completed"
        );

        Ok(rows)
    }

    /// Close the connection, releasing the underlying socket
    pub async fn close(self) -> Result<(), MssqlError> {
        self.closed.store(true, Ordering::SeqCst);
        self.client.into_inner().close().await?;
        tracing::debug!("MS SQL Server connection closed");
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }
}

impl std::fmt::Debug for MssqlConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MssqlConnection")
            .field("database", &self.database)
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish()
    }
}

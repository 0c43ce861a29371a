//! Connection configuration
//!
//! Accepts the `mssql` package's `database.json` layout (`server`, `user`,
//! `options.trustServerCertificate`, ...) as well as a flat TOML file.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::connection::MssqlError;

/// Default SQL Server port
pub const DEFAULT_PORT: u16 = 1433;

/// Driver options nested under `options`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectionOptions {
    pub encrypt: Option<bool>,
    pub trust_server_certificate: Option<bool>,
}

/// SQL Server connection parameters
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    #[serde(alias = "server")]
    pub host: String,
    pub port: u16,
    pub database: Option<String>,
    #[serde(alias = "username")]
    pub user: Option<String>,
    pub password: Option<String>,
    /// Require an encrypted connection
    pub encrypt: bool,
    /// Accept any server certificate (development servers)
    pub trust_cert: bool,
    pub options: ConnectionOptions,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            database: None,
            user: None,
            password: None,
            encrypt: true,
            trust_cert: false,
            options: ConnectionOptions::default(),
        }
    }
}

impl ConnectionConfig {
    /// Load from a `.json` or `.toml` file, chosen by extension
    pub fn from_path(path: &Path) -> Result<Self, MssqlError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            MssqlError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&text)?,
            _ => Self::from_json_str(&text)?,
        };

        tracing::debug!(
            path = %path.display(),
            host = %config.host,
            port = config.port,
            "loaded connection config"
        );
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self, MssqlError> {
        serde_json::from_str(json).map_err(|e| MssqlError::Config(e.to_string()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self, MssqlError> {
        toml::from_str(text).map_err(|e| MssqlError::Config(e.to_string()))
    }

    /// Encryption, with `options.encrypt` taking precedence
    pub fn encryption_required(&self) -> bool {
        self.options.encrypt.unwrap_or(self.encrypt)
    }

    /// Certificate trust, with `options.trustServerCertificate` taking precedence
    pub fn trusts_server_certificate(&self) -> bool {
        self.options.trust_server_certificate.unwrap_or(self.trust_cert)
    }

    pub fn port_or_default(&self) -> u16 {
        if self.port > 0 { self.port } else { DEFAULT_PORT }
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("encrypt", &self.encryption_required())
            .field("trust_cert", &self.trusts_server_certificate())
            .finish()
    }
}

//! The `run` command: connect, generate, write

use anyhow::Context;
use clap::Args;
use sprocgen_core::{
    DEFAULT_CONCURRENCY, GeneratedModule, MetadataSource, RunRequest, Runner, TypeMappingTable,
};
use sprocgen_mssql::{ConnectionConfig, MssqlConnection};
use std::path::{Path, PathBuf};

/// Connection settings that override the config file
#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionOverrides {
    /// Server host name
    #[arg(long, env = "SPROCGEN_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "SPROCGEN_PORT")]
    pub port: Option<u16>,

    /// Database name
    #[arg(long, env = "SPROCGEN_DATABASE")]
    pub database: Option<String>,

    /// SQL Server login
    #[arg(long, env = "SPROCGEN_USER")]
    pub user: Option<String>,

    /// SQL Server password
    #[arg(long, env = "SPROCGEN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl ConnectionOverrides {
    pub fn apply(&self, config: &mut ConnectionConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(database) = &self.database {
            config.database = Some(database.clone());
        }
        if let Some(user) = &self.user {
            config.user = Some(user.clone());
        }
        if let Some(password) = &self.password {
            config.password = Some(password.clone());
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Schema whose procedures are processed (e.g. `dbo`)
    pub schema: Option<String>,

    /// LIKE pattern applied to procedure names (e.g. `mngsp_%`)
    pub pattern: Option<String>,

    /// Connection config file (`.json` or `.toml`)
    #[arg(long, default_value = "database.json")]
    pub config: PathBuf,

    /// Directory the generated module is written to
    #[arg(long, default_value = "exports")]
    pub out_dir: PathBuf,

    /// Alternative type mapping table (JSON)
    #[arg(long)]
    pub types: Option<PathBuf>,

    /// Parameter fetches in flight
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    #[command(flatten)]
    pub connection: ConnectionOverrides,
}

impl RunArgs {
    pub fn load_type_table(&self) -> anyhow::Result<TypeMappingTable> {
        let table = match &self.types {
            Some(path) => TypeMappingTable::from_path(path)
                .with_context(|| format!("loading type table {}", path.display()))?,
            None => TypeMappingTable::bundled().context("loading bundled type table")?,
        };
        Ok(table)
    }

    pub fn load_connection_config(&self) -> anyhow::Result<ConnectionConfig> {
        let mut config = if self.config.exists() {
            ConnectionConfig::from_path(&self.config)?
        } else {
            tracing::debug!(
                path = %self.config.display(),
                "config file not found, using defaults"
            );
            ConnectionConfig::default()
        };
        self.connection.apply(&mut config);
        Ok(config)
    }
}

/// Generate the module for `schema` and write it under `args.out_dir`
pub async fn run(args: &RunArgs, schema: &str) -> anyhow::Result<PathBuf> {
    let table = args.load_type_table()?;
    let config = args.load_connection_config()?;

    let connection = MssqlConnection::connect(&config)
        .await
        .context("connecting to SQL Server")?;

    let mut request = RunRequest::new(schema);
    request.pattern = args.pattern.clone().filter(|p| !p.is_empty());

    let result = generate_to(
        &connection,
        &table,
        &request,
        args.concurrency,
        &args.out_dir,
    )
    .await;

    if let Err(e) = connection.close().await {
        tracing::warn!(error = %e, "failed to close connection");
    }

    result
}

/// Run the generation against `source` and write the module.
///
/// Nothing is written unless every procedure generated cleanly.
pub async fn generate_to<S: MetadataSource + ?Sized>(
    source: &S,
    table: &TypeMappingTable,
    request: &RunRequest,
    concurrency: usize,
    out_dir: &Path,
) -> anyhow::Result<PathBuf> {
    let module = Runner::new(source, table)
        .with_concurrency(concurrency)
        .run(request)
        .await?;
    write_module(out_dir, &module)
}

/// Write a finished module, creating the output directory if needed
pub fn write_module(out_dir: &Path, module: &GeneratedModule) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let path = out_dir.join(module.file_name());
    std::fs::write(&path, module.render())
        .with_context(|| format!("writing {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        procedures = module.wrappers.len(),
        "module written"
    );
    Ok(path)
}

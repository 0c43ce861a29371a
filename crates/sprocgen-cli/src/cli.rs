//! sprocgen command line
//!
//! ```text
//! sprocgen run dbo
//! sprocgen run dbo mngsp_%
//! ```

mod generate;
mod logging;

#[cfg(test)]
mod cli_tests;

use clap::{CommandFactory, Parser, Subcommand};

use crate::generate::RunArgs;
use crate::logging::{LogFormat, LoggingConfig};

const USAGE_EXAMPLES: &str = "\
Examples:
  sprocgen run dbo
     'dbo' is the schema whose procedures are processed

  sprocgen run dbo mngsp_%
     'dbo' is the schema whose procedures are processed
     'mngsp_%' is matched with LIKE against the procedure names";

#[derive(Debug, Parser)]
#[command(name = "sprocgen", version, about, after_help = USAGE_EXAMPLES)]
struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Debug-level logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate wrappers for the procedures of a schema
    Run(RunArgs),
}

fn print_usage() -> anyhow::Result<()> {
    Cli::command().print_help()?;
    println!();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut log_config = LoggingConfig::default().with_format(cli.log_format);
    if cli.verbose {
        log_config = log_config.verbose();
    }
    logging::init(log_config)?;

    let Some(Command::Run(args)) = cli.command else {
        return print_usage();
    };
    let Some(schema) = args.schema.as_deref().filter(|s| !s.is_empty()) else {
        return print_usage();
    };

    match generate::run(&args, schema).await {
        Ok(path) => {
            println!("{}", path.display());
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "generation failed");
            Err(e)
        }
    }
}

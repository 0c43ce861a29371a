//! Tests for argument parsing and output writing

use async_trait::async_trait;
use clap::{CommandFactory, Parser};
use pretty_assertions::assert_eq;
use sprocgen_core::{
    GeneratedModule, MetadataSource, ProcedureId, ProcedureWrapper, RawParameterRow, RunRequest,
    SprocgenError, TypeMappingTable,
};
use sprocgen_mssql::ConnectionConfig;

use crate::generate::{ConnectionOverrides, generate_to, write_module};
use crate::logging::LogFormat;
use crate::{Cli, Command};

#[test]
fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn test_no_subcommand_parses() {
    let cli = Cli::try_parse_from(["sprocgen"]).unwrap();
    assert!(cli.command.is_none());
}

#[test]
fn test_run_without_schema_parses() {
    let cli = Cli::try_parse_from(["sprocgen", "run"]).unwrap();
    let Some(Command::Run(args)) = cli.command else {
        panic!("expected run");
    };
    assert!(args.schema.is_none());
}

#[test]
fn test_run_with_schema_and_pattern() {
    let cli = Cli::try_parse_from([
        "sprocgen",
        "run",
        "dbo",
        "mngsp_%",
        "--out-dir",
        "out",
        "--concurrency",
        "8",
        "--log-format",
        "json",
    ])
    .unwrap();
    assert_eq!(cli.log_format, LogFormat::Json);

    let Some(Command::Run(args)) = cli.command else {
        panic!("expected run");
    };
    assert_eq!(args.schema.as_deref(), Some("dbo"));
    assert_eq!(args.pattern.as_deref(), Some("mngsp_%"));
    assert_eq!(args.out_dir, std::path::PathBuf::from("out"));
    assert_eq!(args.concurrency, 8);
    assert_eq!(args.config, std::path::PathBuf::from("database.json"));
}

#[test]
fn test_connection_overrides_apply() {
    let mut config = ConnectionConfig::default();
    let overrides = ConnectionOverrides {
        host: Some("db".to_string()),
        port: Some(1500),
        database: None,
        user: Some("sa".to_string()),
        password: Some("pw".to_string()),
    };
    overrides.apply(&mut config);

    assert_eq!(config.host, "db");
    assert_eq!(config.port, 1500);
    assert_eq!(config.database, None);
    assert_eq!(config.user.as_deref(), Some("sa"));
    assert_eq!(config.password.as_deref(), Some("pw"));
}

#[test]
fn test_write_module_creates_named_file() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("exports");
    let module = GeneratedModule::new("dbo", Some("mngsp_%".to_string())).with_wrappers(vec![
        ProcedureWrapper {
            schema: "dbo".to_string(),
            procedure: "mngsp_Ping".to_string(),
            parameters: Vec::new(),
            text: "module.exports.dbo.mngsp_Ping = (done) => {}\n".to_string(),
        },
    ]);

    let path = write_module(&out_dir, &module).unwrap();

    assert_eq!(path, out_dir.join("dbo_mngsp.js"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), module.render());
}

/// In-memory catalog keyed by procedure name
struct MemorySource {
    procedures: Vec<(ProcedureId, Vec<RawParameterRow>)>,
}

#[async_trait]
impl MetadataSource for MemorySource {
    async fn list_procedures(
        &self,
        schema: &str,
        _pattern: Option<&str>,
    ) -> sprocgen_core::Result<Vec<ProcedureId>> {
        Ok(self
            .procedures
            .iter()
            .filter(|(id, _)| id.schema == schema)
            .map(|(id, _)| id.clone())
            .collect())
    }

    async fn procedure_parameters(
        &self,
        procedure: &ProcedureId,
    ) -> sprocgen_core::Result<Vec<RawParameterRow>> {
        Ok(self
            .procedures
            .iter()
            .find(|(id, _)| id == procedure)
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }
}

#[tokio::test]
async fn test_generate_to_writes_module() {
    let dir = tempfile::tempdir().unwrap();
    let table = TypeMappingTable::bundled().unwrap();
    let source = MemorySource {
        procedures: vec![(
            ProcedureId::new("dbo", "GetUser"),
            vec![RawParameterRow::new("@Id", "int", 1).with_length(4)],
        )],
    };

    let path = generate_to(&source, &table, &RunRequest::new("dbo"), 2, dir.path())
        .await
        .unwrap();

    assert_eq!(path, dir.path().join("dbo.js"));
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("module.exports.dbo.GetUser = (id, done) => {"));
}

#[tokio::test]
async fn test_generate_to_writes_nothing_for_unmapped_type() {
    let dir = tempfile::tempdir().unwrap();
    let table = TypeMappingTable::bundled().unwrap();
    let source = MemorySource {
        procedures: vec![
            (
                ProcedureId::new("dbo", "GetUser"),
                vec![RawParameterRow::new("@Id", "int", 1).with_length(4)],
            ),
            (
                ProcedureId::new("dbo", "MoveNode"),
                vec![RawParameterRow::new("@Node", "hierarchyid", 1).with_length(892)],
            ),
        ],
    };

    let err = generate_to(&source, &table, &RunRequest::new("dbo"), 2, dir.path())
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<SprocgenError>(),
        Some(SprocgenError::UnsupportedParameterType { .. })
    ));
    assert!(!dir.path().join("dbo.js").exists());
}

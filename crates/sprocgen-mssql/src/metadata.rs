//! Procedure and parameter catalog queries

use async_trait::async_trait;
use sprocgen_core::{MetadataSource, ProcedureId, RawParameterRow, Result, SprocgenError};
use tiberius::{Row, ToSql};

use crate::connection::{MssqlConnection, MssqlError};

/// Procedures of one schema, ordered by name
pub const LIST_PROCEDURES_SQL: &str = "SELECT
    s.name AS schema_name,
    p.name AS procedure_name
 FROM sys.procedures p
 INNER JOIN sys.schemas s ON p.schema_id = s.schema_id
 WHERE s.name = @P1
 ORDER BY p.name";

/// Procedures of one schema whose name matches a LIKE pattern, ordered by name
pub const LIST_PROCEDURES_LIKE_SQL: &str = "SELECT
    s.name AS schema_name,
    p.name AS procedure_name
 FROM sys.procedures p
 INNER JOIN sys.schemas s ON p.schema_id = s.schema_id
 WHERE s.name = @P1 AND p.name LIKE @P2
 ORDER BY p.name";

/// Parameters of one procedure, ordered by position
pub const PROCEDURE_PARAMETERS_SQL: &str = "SELECT
    p.name AS param_name,
    TYPE_NAME(p.user_type_id) AS native_type,
    TYPE_NAME(p.system_type_id) AS system_type,
    p.max_length,
    p.precision,
    p.scale,
    p.parameter_id,
    p.is_output
 FROM sys.parameters p
 WHERE p.object_id = OBJECT_ID(QUOTENAME(@P1) + N'.' + QUOTENAME(@P2))
   AND p.parameter_id > 0
 ORDER BY p.parameter_id";

/// Pick the listing query for an optional name pattern
pub(crate) fn listing_query(pattern: Option<&str>) -> &'static str {
    match pattern {
        Some(_) => LIST_PROCEDURES_LIKE_SQL,
        None => LIST_PROCEDURES_SQL,
    }
}

fn text_column(row: &Row, idx: usize, column: &str) -> std::result::Result<String, MssqlError> {
    row.try_get::<&str, _>(idx)?
        .map(str::to_string)
        .ok_or_else(|| MssqlError::TypeConversion(format!("{} is NULL", column)))
}

fn procedure_from_row(row: &Row) -> std::result::Result<ProcedureId, MssqlError> {
    Ok(ProcedureId::new(
        text_column(row, 0, "schema_name")?,
        text_column(row, 1, "procedure_name")?,
    ))
}

fn parameter_from_row(row: &Row) -> std::result::Result<RawParameterRow, MssqlError> {
    let native_type = text_column(row, 1, "native_type")?;
    let system_type = row
        .try_get::<&str, _>(2)?
        .map(str::to_string)
        .unwrap_or_else(|| native_type.clone());

    Ok(RawParameterRow {
        name: text_column(row, 0, "param_name")?,
        native_type,
        system_type,
        max_length: row.try_get::<i16, _>(3)?.unwrap_or(0),
        precision: row.try_get::<u8, _>(4)?.unwrap_or(0),
        scale: row.try_get::<u8, _>(5)?.unwrap_or(0),
        ordinal: row.try_get::<i32, _>(6)?.unwrap_or(0),
        is_output: row.try_get::<bool, _>(7)?.unwrap_or(false),
    })
}

#[async_trait]
impl MetadataSource for MssqlConnection {
    #[tracing::instrument(skip(self))]
    async fn list_procedures(
        &self,
        schema: &str,
        pattern: Option<&str>,
    ) -> Result<Vec<ProcedureId>> {
        let sql = listing_query(pattern);
        let rows = match pattern {
            Some(pattern) => self.query_rows(sql, &[&schema, &pattern]).await,
            None => self.query_rows(sql, &[&schema]).await,
        }
        .map_err(|e| SprocgenError::ListingQuery(e.to_string()))?;

        rows.iter()
            .map(procedure_from_row)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| SprocgenError::ListingQuery(e.to_string()))
    }

    #[tracing::instrument(skip(self), fields(procedure = %procedure))]
    async fn procedure_parameters(&self, procedure: &ProcedureId) -> Result<Vec<RawParameterRow>> {
        let fetch_error = |e: MssqlError| SprocgenError::MetadataFetch {
            procedure: procedure.qualified_name(),
            message: e.to_string(),
        };

        let params: [&dyn ToSql; 2] = [&procedure.schema, &procedure.name];
        let rows = self
            .query_rows(PROCEDURE_PARAMETERS_SQL, &params)
            .await
            .map_err(fetch_error)?;

        rows.iter()
            .map(parameter_from_row)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(fetch_error)
    }
}

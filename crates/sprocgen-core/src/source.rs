//! Metadata source abstraction
//!
//! The runner only needs two things from a database: the procedures of a
//! schema and the parameter rows of each procedure. Drivers implement this
//! trait; tests use in-memory sources.

use async_trait::async_trait;

use crate::descriptor::RawParameterRow;
use crate::error::Result;

/// Schema-qualified procedure name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcedureId {
    pub schema: String,
    pub name: String,
}

impl ProcedureId {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// `schema.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

impl std::fmt::Display for ProcedureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// Source of stored-procedure metadata
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Procedures in `schema`, ordered by name, optionally restricted by a
    /// LIKE pattern on the procedure name.
    ///
    /// Failures are reported as `SprocgenError::ListingQuery`.
    async fn list_procedures(
        &self,
        schema: &str,
        pattern: Option<&str>,
    ) -> Result<Vec<ProcedureId>>;

    /// Parameter rows of one procedure, ordered by parameter position.
    ///
    /// Failures are reported as `SprocgenError::MetadataFetch`.
    async fn procedure_parameters(&self, procedure: &ProcedureId) -> Result<Vec<RawParameterRow>>;
}

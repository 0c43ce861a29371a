//! Generation pipeline: list, fetch, build, generate

use futures::{StreamExt, TryStreamExt, stream};

use crate::assembler::GeneratedModule;
use crate::descriptor::DescriptorBuilder;
use crate::error::Result;
use crate::generator::{ProcedureWrapper, WrapperGenerator};
use crate::source::{MetadataSource, ProcedureId};
use crate::type_map::TypeMappingTable;

/// Default number of parameter fetches in flight
pub const DEFAULT_CONCURRENCY: usize = 4;

/// What to generate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub schema: String,
    /// LIKE pattern applied to procedure names
    pub pattern: Option<String>,
}

impl RunRequest {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            pattern: None,
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}

/// Runs one generation pass against a metadata source.
///
/// Parameter fetches are issued with bounded parallelism but wrappers always
/// come back in discovery order. The first error ends the run.
pub struct Runner<'a, S: MetadataSource + ?Sized> {
    source: &'a S,
    table: &'a TypeMappingTable,
    concurrency: usize,
}

impl<'a, S: MetadataSource + ?Sized> Runner<'a, S> {
    pub fn new(source: &'a S, table: &'a TypeMappingTable) -> Self {
        Self {
            source,
            table,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    #[tracing::instrument(skip(self), fields(schema = %request.schema, pattern = ?request.pattern))]
    pub async fn run(&self, request: &RunRequest) -> Result<GeneratedModule> {
        let start = std::time::Instant::now();

        let procedures = self
            .source
            .list_procedures(&request.schema, request.pattern.as_deref())
            .await?;

        if procedures.is_empty() {
            tracing::warn!("no procedures matched");
        } else {
            tracing::info!(count = procedures.len(), "discovered procedures");
        }

        let generator = WrapperGenerator::new()?;
        let builder = DescriptorBuilder::new(self.table);

        let wrappers: Vec<ProcedureWrapper> = stream::iter(procedures.iter())
            .map(|procedure| self.fetch(procedure))
            .buffered(self.concurrency)
            .and_then(|(procedure, rows)| {
                let wrapper = builder
                    .build_all(&procedure.name, &rows)
                    .and_then(|params| {
                        generator.generate_wrapper(&request.schema, &procedure.name, params)
                    });
                futures::future::ready(wrapper)
            })
            .try_collect()
            .await?;

        tracing::debug!(
            wrappers = wrappers.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "generation completed"
        );

        Ok(GeneratedModule::new(request.schema.clone(), request.pattern.clone())
            .with_wrappers(wrappers))
    }

    async fn fetch<'p>(
        &self,
        procedure: &'p ProcedureId,
    ) -> Result<(&'p ProcedureId, Vec<crate::descriptor::RawParameterRow>)> {
        tracing::debug!(procedure = %procedure, "processing");
        let rows = self.source.procedure_parameters(procedure).await?;
        Ok((procedure, rows))
    }
}

impl<S: MetadataSource + ?Sized> std::fmt::Debug for Runner<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("concurrency", &self.concurrency)
            .field("types", &self.table.len())
            .finish()
    }
}

//! Module assembly and output naming

use crate::generator::{ProcedureWrapper, member_access};

/// Extension of the generated module
pub const OUTPUT_EXTENSION: &str = "js";

const PREAMBLE: &str = "const sql = require('mssql')\n";
const END_MARKER: &str = "// End\n";

/// Concatenate wrapper texts into one module under the schema namespace
pub fn assemble<S: AsRef<str>>(schema: &str, wrapper_texts: &[S]) -> String {
    let mut module = String::from(PREAMBLE);
    module.push_str(&format!("module.exports{} = {{}}\n", member_access(schema)));
    for text in wrapper_texts {
        module.push_str(text.as_ref());
    }
    module.push_str(END_MARKER);
    module
}

/// Remove LIKE wildcards and path separators from a name filter
pub fn sanitize_filter(filter: &str) -> String {
    filter
        .chars()
        .filter(|c| !matches!(c, '%' | '_' | '/' | '\\'))
        .collect()
}

/// `{schema}.js`, or `{schema}_{filter}.js` when a filter was given
pub fn output_file_name(schema: &str, filter: Option<&str>) -> String {
    match filter {
        Some(filter) => format!(
            "{}_{}.{}",
            schema,
            sanitize_filter(filter),
            OUTPUT_EXTENSION
        ),
        None => format!("{}.{}", schema, OUTPUT_EXTENSION),
    }
}

/// All wrappers generated for one schema in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModule {
    pub schema: String,
    pub filter: Option<String>,
    pub wrappers: Vec<ProcedureWrapper>,
}

impl GeneratedModule {
    pub fn new(schema: impl Into<String>, filter: Option<String>) -> Self {
        Self {
            schema: schema.into(),
            filter,
            wrappers: Vec::new(),
        }
    }

    pub fn with_wrappers(mut self, wrappers: Vec<ProcedureWrapper>) -> Self {
        self.wrappers = wrappers;
        self
    }

    /// Full module text
    pub fn render(&self) -> String {
        let texts: Vec<&str> = self.wrappers.iter().map(|w| w.text.as_str()).collect();
        assemble(&self.schema, &texts)
    }

    pub fn file_name(&self) -> String {
        output_file_name(&self.schema, self.filter.as_deref())
    }

    pub fn procedure_names(&self) -> impl Iterator<Item = &str> {
        self.wrappers.iter().map(|w| w.procedure.as_str())
    }
}

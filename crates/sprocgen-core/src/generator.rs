//! Procedure wrapper generator using MiniJinja
//!
//! Each wrapper is a JavaScript function on the schema namespace that binds
//! its parameters on an `mssql` request, executes the procedure and reports
//! back through an error-first `done(err, result, outputs)` callback.

use minijinja::{AutoEscape, Environment};
use serde::Serialize;

use crate::descriptor::ParameterDescriptor;
use crate::error::Result;

const WRAPPER_TEMPLATE_NAME: &str = "wrapper";

const WRAPPER_TEMPLATE: &str = r#"
/**
 * @function {{ procedure_doc }}
{% for p in parameters %}
 * @param {{ "{" ~ p.display_type ~ "}" }} {{ p.identifier }} - {{ p.native_type }} (len and precision: {{ p.annotation }}){{ " OUTPUT" if p.is_output else "" }}
{% endfor %}
 * @param done {function} callback(err, result{{ ", outputs" if outputs else "" }})
 */
module.exports{{ schema_access }}{{ procedure_access }} = ({% for p in inputs %}{{ p.identifier }}, {% endfor %}done) => {
  const request = new sql.Request()
{% for p in inputs %}
    .input('{{ p.identifier }}', {{ p.binding }}, {{ p.identifier }})
{% endfor %}
{% for p in outputs %}
    .output('{{ p.identifier }}', {{ p.binding }})
{% endfor %}
  request.execute('{{ target }}')
    .then(result => {
      const outputs = Object.keys(result.output || {}).map(key => ({ [key]: result.output[key] }))
      done(null, result, outputs)
    })
    .catch(err => {
      done(err, null)
    })
}
"#;

/// A generated wrapper together with the metadata it was generated from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureWrapper {
    pub schema: String,
    pub procedure: String,
    pub parameters: Vec<ParameterDescriptor>,
    pub text: String,
}

#[derive(Debug, Serialize)]
struct ParameterView<'a> {
    identifier: &'a str,
    display_type: String,
    native_type: String,
    annotation: String,
    binding: &'a str,
    is_output: bool,
}

impl<'a> From<&'a ParameterDescriptor> for ParameterView<'a> {
    fn from(param: &'a ParameterDescriptor) -> Self {
        Self {
            identifier: &param.identifier,
            display_type: doc_text(&param.display_type),
            native_type: doc_text(&param.native_type),
            annotation: param.length_precision(),
            binding: &param.binding_expression,
            is_output: param.is_output,
        }
    }
}

#[derive(Debug, Serialize)]
struct WrapperContext<'a> {
    procedure_doc: String,
    schema_access: String,
    procedure_access: String,
    target: String,
    parameters: Vec<ParameterView<'a>>,
    inputs: Vec<ParameterView<'a>>,
    outputs: Vec<ParameterView<'a>>,
}

/// Renders wrapper functions for stored procedures
pub struct WrapperGenerator {
    env: Environment<'static>,
}

impl WrapperGenerator {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        // Generated code is JavaScript, never HTML or JSON.
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_template(WRAPPER_TEMPLATE_NAME, WRAPPER_TEMPLATE)?;

        Ok(Self { env })
    }

    /// Render the wrapper text for one procedure.
    ///
    /// `parameters` must already be in ordinal order; inputs and outputs keep
    /// that order within their own partition.
    pub fn generate(
        &self,
        schema: &str,
        procedure: &str,
        parameters: &[ParameterDescriptor],
    ) -> Result<String> {
        let context = WrapperContext {
            procedure_doc: doc_text(procedure),
            schema_access: member_access(schema),
            procedure_access: member_access(procedure),
            target: js_string_content(&format!("{}.{}", schema, procedure)),
            parameters: parameters.iter().map(ParameterView::from).collect(),
            inputs: parameters
                .iter()
                .filter(|p| !p.is_output)
                .map(ParameterView::from)
                .collect(),
            outputs: parameters
                .iter()
                .filter(|p| p.is_output)
                .map(ParameterView::from)
                .collect(),
        };

        let rendered = self
            .env
            .get_template(WRAPPER_TEMPLATE_NAME)?
            .render(&context)?;

        Ok(strip_blank_lines(&rendered))
    }

    /// Render a wrapper and keep the descriptors it was built from
    pub fn generate_wrapper(
        &self,
        schema: &str,
        procedure: &str,
        parameters: Vec<ParameterDescriptor>,
    ) -> Result<ProcedureWrapper> {
        let text = self.generate(schema, procedure, &parameters)?;
        Ok(ProcedureWrapper {
            schema: schema.to_string(),
            procedure: procedure.to_string(),
            parameters,
            text,
        })
    }
}

impl std::fmt::Debug for WrapperGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrapperGenerator").finish_non_exhaustive()
    }
}

/// Drop whitespace-only lines and end the text with a single newline
pub(crate) fn strip_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Make text safe inside a `/** ... */` block
pub(crate) fn doc_text(text: &str) -> String {
    text.replace("*/", "*\\/")
}

/// Whether `name` can be used after a `.` in JavaScript
pub(crate) fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// `.name`, or `['name']` when the name is not a plain identifier
pub(crate) fn member_access(name: &str) -> String {
    if is_plain_identifier(name) {
        format!(".{}", name)
    } else {
        format!("['{}']", js_string_content(name))
    }
}

/// Escape text for use inside a single-quoted JavaScript string
pub(crate) fn js_string_content(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}

//! Parameter descriptor builder
//!
//! Turns one `sys.parameters` row into the normalized descriptor the wrapper
//! generator works from: a JavaScript-safe identifier, the output type from
//! the mapping table, and the `sql.*` binding expression.

use serde::Serialize;
use std::collections::HashSet;

use crate::error::{Result, SprocgenError};
use crate::odbc;
use crate::type_map::{SerializationForm, TypeMappingTable};

/// One stored-procedure parameter as fetched from the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParameterRow {
    /// Parameter name including the leading `@`
    pub name: String,
    /// Declared type name (`type_name(user_type_id)`)
    pub native_type: String,
    /// Base system type name (`type_name(system_type_id)`)
    pub system_type: String,
    /// Storage width in bytes, `-1` for `(max)` types
    pub max_length: i16,
    pub precision: u8,
    pub scale: u8,
    /// `parameter_id`, 1-based
    pub ordinal: i32,
    pub is_output: bool,
}

impl RawParameterRow {
    /// Row for a parameter whose declared type is also its system type
    pub fn new(name: impl Into<String>, native_type: impl Into<String>, ordinal: i32) -> Self {
        let native_type = native_type.into();
        Self {
            name: name.into(),
            system_type: native_type.clone(),
            native_type,
            max_length: 0,
            precision: 0,
            scale: 0,
            ordinal,
            is_output: false,
        }
    }

    pub fn with_system_type(mut self, system_type: impl Into<String>) -> Self {
        self.system_type = system_type.into();
        self
    }

    pub fn with_length(mut self, max_length: i16) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_precision(mut self, precision: u8, scale: u8) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    pub fn output(mut self) -> Self {
        self.is_output = true;
        self
    }
}

/// How a binding constructor is parameterized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    /// `sql.Int`
    Plain,
    /// `sql.NVarChar(50)`
    Length,
    /// `sql.Decimal(18, 2)`
    PrecisionScale,
    /// `sql.DateTime2(7)`
    Scale,
}

/// A `sql.*` binding constructor and its parameterization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BindingType {
    pub constructor: &'static str,
    pub kind: BindingKind,
}

impl BindingType {
    const fn new(constructor: &'static str, kind: BindingKind) -> Self {
        Self { constructor, kind }
    }

    /// Resolve the binding for a native type name (case-insensitive)
    pub fn for_native_type(native_type: &str) -> Option<Self> {
        use BindingKind::*;

        let binding = match native_type.to_lowercase().as_str() {
            "bit" => Self::new("Bit", Plain),
            "bigint" => Self::new("BigInt", Plain),
            "decimal" => Self::new("Decimal", PrecisionScale),
            "float" => Self::new("Float", Plain),
            "int" => Self::new("Int", Plain),
            "money" => Self::new("Money", Plain),
            "numeric" => Self::new("Numeric", PrecisionScale),
            "smallint" => Self::new("SmallInt", Plain),
            "smallmoney" => Self::new("SmallMoney", Plain),
            "real" => Self::new("Real", Plain),
            "tinyint" => Self::new("TinyInt", Plain),
            "char" => Self::new("Char", Length),
            "nchar" => Self::new("NChar", Length),
            "text" => Self::new("Text", Plain),
            "ntext" => Self::new("NText", Plain),
            "varchar" => Self::new("VarChar", Length),
            "nvarchar" | "sysname" => Self::new("NVarChar", Length),
            "xml" => Self::new("Xml", Plain),
            "time" => Self::new("Time", Scale),
            "datetime2" => Self::new("DateTime2", Scale),
            "datetimeoffset" => Self::new("DateTimeOffset", Scale),
            "date" => Self::new("Date", Plain),
            "datetime" => Self::new("DateTime", Plain),
            "smalldatetime" => Self::new("SmallDateTime", Plain),
            "uniqueidentifier" => Self::new("UniqueIdentifier", Plain),
            "variant" | "sql_variant" => Self::new("Variant", Plain),
            "binary" => Self::new("Binary", Length),
            "varbinary" => Self::new("VarBinary", Length),
            "image" => Self::new("Image", Plain),
            "udt" => Self::new("UDT", Plain),
            "geography" => Self::new("Geography", Plain),
            "geometry" => Self::new("Geometry", Plain),
            _ => return None,
        };
        Some(binding)
    }

    /// Render the binding expression, e.g. `sql.Decimal(18, 2)`
    pub fn render(&self, max_length: i16, precision: i32, scale: i32) -> String {
        match self.kind {
            BindingKind::Plain => format!("sql.{}", self.constructor),
            BindingKind::Length if max_length < 0 => format!("sql.{}(sql.MAX)", self.constructor),
            BindingKind::Length => format!("sql.{}({})", self.constructor, max_length),
            BindingKind::PrecisionScale => {
                format!("sql.{}({}, {})", self.constructor, precision, scale)
            }
            BindingKind::Scale => format!("sql.{}({})", self.constructor, scale),
        }
    }
}

/// Normalized parameter, ready for code generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterDescriptor {
    /// Binding-safe name: the raw name without `@`, lowercased
    pub identifier: String,
    pub display_type: String,
    pub serialization_form: SerializationForm,
    pub binding: BindingType,
    /// Full binding expression, e.g. `sql.NVarChar(50)`
    pub binding_expression: String,
    pub is_output: bool,
    pub native_type: String,
    pub max_length: i16,
    pub precision: Option<i32>,
    pub scale: Option<i32>,
    pub ordinal: i32,
}

impl ParameterDescriptor {
    /// `len:precision` annotation used in the generated documentation
    pub fn length_precision(&self) -> String {
        match self.precision {
            Some(precision) => format!("{}:{}", self.max_length, precision),
            None => format!("{}:null", self.max_length),
        }
    }
}

/// Names the generated function body claims for itself, plus JavaScript
/// reserved words that cannot be used as parameter names.
const RESERVED_IDENTIFIERS: &[&str] = &[
    "done", "sql", "request", "arguments", "await", "break", "case", "catch", "class", "const",
    "continue", "debugger", "default", "delete", "do", "else", "enum", "eval", "export",
    "extends", "false", "finally", "for", "function", "if", "implements", "import", "in",
    "instanceof", "interface", "let", "new", "null", "package", "private", "protected", "public",
    "return", "static", "super", "switch", "this", "throw", "true", "try", "typeof", "var",
    "void", "while", "with", "yield",
];

/// Strip the leading `@` and lowercase
pub fn normalize_identifier(name: &str) -> String {
    name.strip_prefix('@').unwrap_or(name).to_lowercase()
}

fn check_identifier(identifier: &str) -> std::result::Result<(), String> {
    let mut chars = identifier.chars();
    match chars.next() {
        None => return Err("name is empty".to_string()),
        Some(c) if !(c.is_alphabetic() || c == '_' || c == '$') => {
            return Err(format!("'{}' cannot start an identifier", c));
        }
        Some(_) => {}
    }
    if let Some(c) = chars.find(|c| !(c.is_alphanumeric() || *c == '_' || *c == '$')) {
        return Err(format!("'{}' is not allowed in an identifier", c));
    }
    if RESERVED_IDENTIFIERS.contains(&identifier) {
        return Err(format!("'{}' is reserved in the generated code", identifier));
    }
    Ok(())
}

/// Builds parameter descriptors against a type mapping table
#[derive(Debug, Clone, Copy)]
pub struct DescriptorBuilder<'a> {
    table: &'a TypeMappingTable,
}

impl<'a> DescriptorBuilder<'a> {
    pub fn new(table: &'a TypeMappingTable) -> Self {
        Self { table }
    }

    /// Normalize a single row. `procedure` is only used for error context.
    pub fn build(&self, procedure: &str, row: &RawParameterRow) -> Result<ParameterDescriptor> {
        let binding = BindingType::for_native_type(&row.native_type).ok_or_else(|| {
            SprocgenError::UnsupportedParameterType {
                procedure: procedure.to_string(),
                parameter: row.name.clone(),
                native_type: row.native_type.clone(),
            }
        })?;
        let mapping = self.table.lookup(&row.native_type)?;

        let identifier = normalize_identifier(&row.name);
        check_identifier(&identifier).map_err(|reason| SprocgenError::InvalidIdentifier {
            procedure: procedure.to_string(),
            name: row.name.clone(),
            reason,
        })?;

        let precision = if row.system_type.eq_ignore_ascii_case("uniqueidentifier") {
            Some(i32::from(row.precision))
        } else {
            odbc::derive_precision(&row.system_type, row.max_length, row.precision, row.scale)
        };
        let scale = odbc::odbc_scale(&row.system_type, row.scale);

        let binding_expression = binding.render(
            row.max_length,
            precision.unwrap_or(i32::from(row.precision)),
            scale.unwrap_or(i32::from(row.scale)),
        );

        Ok(ParameterDescriptor {
            identifier,
            display_type: mapping.display_type.clone(),
            serialization_form: mapping.serialization_form,
            binding,
            binding_expression,
            is_output: row.is_output,
            native_type: row.native_type.clone(),
            max_length: row.max_length,
            precision,
            scale,
            ordinal: row.ordinal,
        })
    }

    /// Normalize all parameters of one procedure, in ordinal order.
    ///
    /// Fails when two parameters normalize to the same identifier.
    pub fn build_all(
        &self,
        procedure: &str,
        rows: &[RawParameterRow],
    ) -> Result<Vec<ParameterDescriptor>> {
        let mut ordered: Vec<&RawParameterRow> = rows.iter().collect();
        ordered.sort_by_key(|row| row.ordinal);

        let mut seen = HashSet::new();
        let mut descriptors = Vec::with_capacity(ordered.len());
        for row in ordered {
            let descriptor = self.build(procedure, row)?;
            if !seen.insert(descriptor.identifier.clone()) {
                return Err(SprocgenError::DuplicateParameter {
                    procedure: procedure.to_string(),
                    identifier: descriptor.identifier,
                });
            }
            descriptors.push(descriptor);
        }

        Ok(descriptors)
    }
}

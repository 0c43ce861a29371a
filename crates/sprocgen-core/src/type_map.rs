//! Native type name to output type lookup
//!
//! The table maps every SQL Server scalar type a procedure parameter can be
//! declared with to the type shown in the generated documentation and the
//! form its values take on the JavaScript side. It is loaded once at startup
//! and only read afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Result, SprocgenError};

const BUNDLED_TABLE: &str = include_str!("types.json");

/// Shape of a parameter value once it crosses into JavaScript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializationForm {
    Number,
    String,
    Boolean,
    Date,
    Binary,
    Object,
}

impl SerializationForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            SerializationForm::Number => "number",
            SerializationForm::String => "string",
            SerializationForm::Boolean => "boolean",
            SerializationForm::Date => "date",
            SerializationForm::Binary => "binary",
            SerializationForm::Object => "object",
        }
    }
}

/// Output type descriptor for one native type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMapping {
    /// Type name written into the generated `@param {...}` annotations
    pub display_type: String,
    /// How values of this type are serialized
    pub serialization_form: SerializationForm,
}

/// Read-only lookup table keyed by lowercased native type name
#[derive(Debug, Clone, Default)]
pub struct TypeMappingTable {
    entries: BTreeMap<String, TypeMapping>,
}

impl TypeMappingTable {
    /// The table shipped with the crate, covering the SQL Server scalar types
    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_TABLE)
    }

    /// Parse a table from a JSON object of `{ "<type>": { display_type, serialization_form } }`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, TypeMapping> = serde_json::from_str(json)
            .map_err(|e| SprocgenError::InvalidTypeTable(e.to_string()))?;

        let mut entries = BTreeMap::new();
        for (name, mapping) in raw {
            let key = name.trim().to_lowercase();
            if key.is_empty() {
                return Err(SprocgenError::InvalidTypeTable(
                    "empty native type name".to_string(),
                ));
            }
            if entries.insert(key.clone(), mapping).is_some() {
                return Err(SprocgenError::InvalidTypeTable(format!(
                    "native type '{}' is listed more than once",
                    key
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Load a table from a JSON file
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let table = Self::from_json_str(&json)?;
        tracing::debug!(
            path = %path.display(),
            entries = table.len(),
            "loaded type mapping table"
        );
        Ok(table)
    }

    /// Look up the mapping for a native type name (case-insensitive)
    pub fn lookup(&self, native_type: &str) -> Result<&TypeMapping> {
        self.entries
            .get(&native_type.to_lowercase())
            .ok_or_else(|| SprocgenError::UnknownType(native_type.to_string()))
    }

    pub fn contains(&self, native_type: &str) -> bool {
        self.entries.contains_key(&native_type.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Native type names in the table, in sorted order
    pub fn native_types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

//! Error types for sprocgen

use thiserror::Error;

/// Errors raised while turning procedure metadata into wrapper code.
///
/// Every variant is fatal to a run: nothing is retried and no output file is
/// written once one of these has been returned.
#[derive(Error, Debug)]
pub enum SprocgenError {
    #[error("Unknown type: '{0}' has no entry in the type mapping table")]
    UnknownType(String),

    #[error(
        "Unsupported parameter type '{native_type}' for parameter {parameter} of {procedure}"
    )]
    UnsupportedParameterType {
        procedure: String,
        parameter: String,
        native_type: String,
    },

    #[error("Parameter {name} of {procedure} does not map to a usable identifier: {reason}")]
    InvalidIdentifier {
        procedure: String,
        name: String,
        reason: String,
    },

    #[error("Duplicate parameter identifier '{identifier}' in {procedure}")]
    DuplicateParameter {
        procedure: String,
        identifier: String,
    },

    #[error("Failed to fetch parameters for {procedure}: {message}")]
    MetadataFetch { procedure: String, message: String },

    #[error("Procedure listing query failed: {0}")]
    ListingQuery(String),

    #[error("Invalid type mapping table: {0}")]
    InvalidTypeTable(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for sprocgen operations
pub type Result<T> = std::result::Result<T, SprocgenError>;

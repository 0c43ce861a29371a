//! Stored-procedure wrapper generation
//!
//! This crate turns SQL Server stored-procedure metadata into a JavaScript
//! module of callable wrappers for the `mssql` package:
//!
//! - **Type mapping**: native type name to documented output type
//! - **Descriptor building**: parameter rows to identifiers and `sql.*` bindings
//! - **Wrapper generation**: one MiniJinja-rendered function per procedure
//! - **Assembly**: all wrappers under a schema-named namespace in one file
//! - **Runner**: drives a [`MetadataSource`] through the whole pipeline
//!
//! ## Example
//!
//! ```rust,ignore
//! use sprocgen_core::{RunRequest, Runner, TypeMappingTable};
//!
//! let table = TypeMappingTable::bundled()?;
//! let module = Runner::new(&source, &table)
//!     .with_concurrency(4)
//!     .run(&RunRequest::new("dbo").with_pattern("mngsp_%"))
//!     .await?;
//! std::fs::write(module.file_name(), module.render())?;
//! ```

mod assembler;
mod descriptor;
mod error;
mod generator;
pub mod odbc;
mod runner;
mod source;
mod type_map;

#[cfg(test)]
mod assembler_tests;
#[cfg(test)]
mod descriptor_tests;
#[cfg(test)]
mod generator_tests;
#[cfg(test)]
mod odbc_tests;
#[cfg(test)]
mod runner_tests;
#[cfg(test)]
mod type_map_tests;

pub use assembler::{
    GeneratedModule, OUTPUT_EXTENSION, assemble, output_file_name, sanitize_filter,
};
pub use descriptor::{
    BindingKind, BindingType, DescriptorBuilder, ParameterDescriptor, RawParameterRow,
    normalize_identifier,
};
pub use error::{Result, SprocgenError};
pub use generator::{ProcedureWrapper, WrapperGenerator};
pub use runner::{DEFAULT_CONCURRENCY, RunRequest, Runner};
pub use source::{MetadataSource, ProcedureId};
pub use type_map::{SerializationForm, TypeMapping, TypeMappingTable};

//! MS SQL Server metadata source for sprocgen
//!
//! This crate connects to SQL Server with tiberius and reads the procedure
//! and parameter catalog views the generator works from.

mod config;
mod connection;
mod metadata;

#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod metadata_tests;

pub use config::{ConnectionConfig, ConnectionOptions, DEFAULT_PORT};
pub use connection::{MssqlConnection, MssqlError};
pub use metadata::{LIST_PROCEDURES_SQL, LIST_PROCEDURES_LIKE_SQL, PROCEDURE_PARAMETERS_SQL};

//! Precision and scale as SQL Server reports them through ODBC
//!
//! `sys.parameters` stores the raw catalog precision/scale, which for most
//! types is not what the wire protocol expects (character types carry their
//! width in bytes, `float` carries its mantissa bits, dates carry nothing).
//! These functions apply the engine's column-size and decimal-digit rules to
//! the base system type and its storage width.

/// Column size reported for the `(max)` variants of the wide character types
pub const MAX_NCHAR_PRECISION: i32 = 1_073_741_823;
/// Column size reported for the `(max)` variants of byte-oriented types
pub const MAX_BYTE_PRECISION: i32 = 2_147_483_647;

/// ODBC precision (column size) for a parameter of `system_type`.
///
/// `max_length` is the catalog storage width in bytes, `-1` for `(max)`.
pub fn odbc_precision(system_type: &str, max_length: i16, precision: u8) -> Option<i32> {
    let width = i32::from(max_length);
    let value = match system_type.to_lowercase().as_str() {
        "char" | "varchar" | "binary" | "varbinary" => {
            if width < 0 {
                MAX_BYTE_PRECISION
            } else {
                width
            }
        }
        "nchar" | "nvarchar" | "sysname" => {
            if width < 0 {
                MAX_NCHAR_PRECISION
            } else {
                width / 2
            }
        }
        "decimal" | "numeric" => i32::from(precision),
        "bit" => 1,
        "tinyint" => 3,
        "smallint" => 5,
        "int" => 10,
        "bigint" => 19,
        "real" => 7,
        "float" => {
            if precision <= 24 {
                7
            } else {
                15
            }
        }
        "smallmoney" => 10,
        "money" => 19,
        "date" => 10,
        "smalldatetime" => 16,
        "datetime" => 23,
        "text" | "image" => MAX_BYTE_PRECISION,
        "ntext" | "xml" => MAX_NCHAR_PRECISION,
        "sql_variant" => 8000,
        "uniqueidentifier" => 36,
        "time" | "datetime2" | "datetimeoffset" => return None,
        _ => {
            if width < 0 {
                MAX_BYTE_PRECISION
            } else {
                width
            }
        }
    };
    Some(value)
}

/// ODBC precision for the fractional-second time types, which also depends on the scale
pub fn odbc_time_precision(system_type: &str, scale: u8) -> Option<i32> {
    let fraction = if scale == 0 { 0 } else { i32::from(scale) + 1 };
    match system_type.to_lowercase().as_str() {
        "time" => Some(8 + fraction),
        "datetime2" => Some(19 + fraction),
        "datetimeoffset" => Some(26 + fraction),
        _ => None,
    }
}

/// ODBC scale (decimal digits) for a parameter of `system_type`.
///
/// Types without a meaningful scale (strings, binaries, approximate numerics)
/// report `None`.
pub fn odbc_scale(system_type: &str, scale: u8) -> Option<i32> {
    match system_type.to_lowercase().as_str() {
        "decimal" | "numeric" | "time" | "datetime2" | "datetimeoffset" => Some(i32::from(scale)),
        "bit" | "tinyint" | "smallint" | "int" | "bigint" => Some(0),
        "smalldatetime" => Some(0),
        "datetime" => Some(3),
        "money" | "smallmoney" => Some(4),
        _ => None,
    }
}

/// Precision for any system type, folding in the time-type rules
pub fn derive_precision(system_type: &str, max_length: i16, precision: u8, scale: u8) -> Option<i32> {
    odbc_precision(system_type, max_length, precision)
        .or_else(|| odbc_time_precision(system_type, scale))
}

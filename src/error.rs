use std::num::ParseIntError;

use thiserror::Error;

/// Failures surfaced while building a schema, reading records, or moving
/// bytes across the file boundary. There is no local recovery: the first
/// error aborts the whole conversion.
#[derive(Debug, Error)]
pub enum TateError {
    /// A trailing-digit suffix failed integer parsing. The match pattern
    /// guarantees digits, so this only fires on digit runs too large for
    /// `usize`.
    #[error("repeat suffix '{suffix}' of column '{column}' is not a number")]
    Schema {
        column: String,
        suffix: String,
        #[source]
        source: ParseIntError,
    },
    /// Malformed CSV record (ragged field count etc.) during header or
    /// body read.
    #[error(transparent)]
    Input(#[from] csv::Error),
    /// File open/create or stream failure at the boundary.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Output text not representable in the selected encoding.
    #[error("failed to encode output as {encoding}")]
    Encode { encoding: &'static str },
}

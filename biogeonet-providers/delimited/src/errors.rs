use std::io;

use thiserror::Error;

/// Failure raised while reading a delimited relation or area table.
#[derive(Debug, Error)]
pub enum DelimitedProviderError {
    /// A named column is missing from the header row.
    #[error("column `{name}` not found in header")]
    ColumnNotFound {
        /// Requested column name.
        name: String,
    },
    /// A positional selector points past the end of a record.
    #[error("column position {position} is out of range for a record with {width} fields (line {line})")]
    PositionOutOfRange {
        /// Zero-based position requested.
        position: usize,
        /// Number of fields in the record.
        width: usize,
        /// One-based line number of the record.
        line: u64,
    },
    /// Columns were selected by name but the input has no header row.
    #[error("column `{name}` selected by name but the input has no header row")]
    NameWithoutHeader {
        /// Requested column name.
        name: String,
    },
    /// A site or species field was empty.
    #[error("empty {field} field on line {line}")]
    EmptyField {
        /// Role of the empty field.
        field: &'static str,
        /// One-based line number of the record.
        line: u64,
    },
    /// A numeric field did not hold a finite, non-negative number.
    #[error("invalid {field} value `{value}` on line {line}")]
    InvalidNumber {
        /// Role of the numeric field.
        field: &'static str,
        /// Raw text of the field.
        value: String,
        /// One-based line number of the record.
        line: u64,
    },
    /// The input held no data rows.
    #[error("input contains no data rows")]
    EmptyInput,
    /// The CSV reader failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// Opening the input failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

use arrow_schema::{ArrowError, DataType};
use thiserror::Error;

/// Failure raised while reading an occurrence relation from Parquet.
#[derive(Debug, Error)]
pub enum ParquetProviderError {
    /// A requested column is missing from the file schema.
    #[error("column `{column}` not found in Parquet schema")]
    ColumnNotFound {
        /// Requested column name.
        column: String,
    },
    /// A column has a type the reader cannot interpret.
    #[error("column `{column}` has unsupported type {actual:?}")]
    InvalidColumnType {
        /// Column name.
        column: String,
        /// Arrow type found in the file.
        actual: DataType,
    },
    /// A site or species value was null or blank.
    #[error("column `{column}` is null or blank at row {row}")]
    NullValue {
        /// Column name.
        column: String,
        /// Zero-based row across all batches.
        row: usize,
    },
    /// An abundance was negative or not finite.
    #[error("invalid abundance {value} at row {row}")]
    InvalidAbundance {
        /// Zero-based row across all batches.
        row: usize,
        /// The offending value.
        value: f64,
    },
    /// The file held no rows.
    #[error("Parquet input contains no rows")]
    EmptyInput,
    /// Arrow decoding failed.
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
    /// Parquet decoding failed.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    /// Opening the input failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

//! Parquet provider for occurrence relations.
//!
//! Decodes the site, species and optional abundance columns of a Parquet
//! file through Arrow record batches.

mod errors;
mod ingest;
mod provider;

pub use errors::ParquetProviderError;
pub use provider::{
    ParquetColumns, read_relation_parquet, read_relation_parquet_reader, relation_from_batches,
};

#[cfg(test)]
mod tests;

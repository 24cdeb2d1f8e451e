pub(crate) use super::{ParquetColumns, ParquetProviderError};

mod ingest;
mod support;

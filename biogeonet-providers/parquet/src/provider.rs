//! Occurrence relations from Parquet files.
use std::{fs::File, path::Path};

use arrow_array::{RecordBatch, RecordBatchReader};
use biogeonet_core::{Occurrence, OccurrenceRelation};
use parquet::arrow::{ProjectionMask, arrow_reader::ParquetRecordBatchReaderBuilder};
use parquet::file::reader::ChunkReader;
use tracing::{info, instrument};

use crate::errors::ParquetProviderError;
use crate::ingest::{abundances, labels};

/// Names of the columns holding each occurrence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParquetColumns {
    site: String,
    species: String,
    abundance: Option<String>,
}

impl Default for ParquetColumns {
    fn default() -> Self {
        Self::new("site", "species")
    }
}

impl ParquetColumns {
    /// Selects the site and species columns; no abundance column.
    #[must_use]
    pub fn new(site: impl Into<String>, species: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            species: species.into(),
            abundance: None,
        }
    }

    /// Adds a numeric abundance column.
    #[must_use]
    pub fn with_abundance(mut self, abundance: impl Into<String>) -> Self {
        self.abundance = Some(abundance.into());
        self
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        [Some(self.site.as_str()), Some(self.species.as_str()), self.abundance.as_deref()]
            .into_iter()
            .flatten()
    }
}

/// Reads an occurrence relation from the Parquet file at `path`.
///
/// # Errors
/// Returns [`ParquetProviderError`] when the file cannot be opened or
/// decoded, a column is missing or mistyped, or a value is invalid.
pub fn read_relation_parquet(
    path: impl AsRef<Path>,
    columns: &ParquetColumns,
) -> Result<OccurrenceRelation, ParquetProviderError> {
    let file = File::open(path)?;
    read_relation_parquet_reader(file, columns)
}

/// Reads an occurrence relation from a Parquet reader.
///
/// Only the selected columns are decoded. Site and species columns must be
/// `Utf8` or `LargeUtf8`; the abundance column may be any float or 32/64-bit
/// integer type.
///
/// # Errors
/// Returns [`ParquetProviderError`] when decoding fails, a column is
/// missing or mistyped, or a value is invalid.
#[instrument(name = "parquet.read_relation", err, skip(reader, columns))]
pub fn read_relation_parquet_reader<R>(
    reader: R,
    columns: &ParquetColumns,
) -> Result<OccurrenceRelation, ParquetProviderError>
where
    R: ChunkReader + Send + 'static,
{
    let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
    let mask = ProjectionMask::columns(builder.parquet_schema(), columns.names());
    let reader = builder.with_projection(mask).build()?;
    let schema = reader.schema();
    for name in columns.names() {
        if schema.index_of(name).is_err() {
            return Err(ParquetProviderError::ColumnNotFound {
                column: name.to_owned(),
            });
        }
    }
    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    relation_from_batches(&batches, columns)
}

/// Builds an occurrence relation from in-memory record batches.
///
/// # Errors
/// Returns [`ParquetProviderError`] when a column is missing or mistyped, a
/// value is invalid, or the batches hold no rows.
pub fn relation_from_batches(
    batches: &[RecordBatch],
    columns: &ParquetColumns,
) -> Result<OccurrenceRelation, ParquetProviderError> {
    let mut rows = Vec::new();
    for batch in batches {
        let start_row = rows.len();
        let sites = labels(column(batch, &columns.site)?, &columns.site, start_row)?;
        let species = labels(column(batch, &columns.species)?, &columns.species, start_row)?;
        let weights = match columns.abundance.as_deref() {
            Some(name) => abundances(column(batch, name)?, name, start_row)?,
            None => vec![None; batch.num_rows()],
        };
        rows.extend(sites.into_iter().zip(species).zip(weights).map(
            |((site, species), weight)| {
                let row = Occurrence::new(site, species);
                match weight {
                    Some(value) => row.with_abundance(value),
                    None => row,
                }
            },
        ));
    }
    if rows.is_empty() {
        return Err(ParquetProviderError::EmptyInput);
    }
    let relation = OccurrenceRelation::new(rows);
    info!(
        rows = relation.len(),
        sites = relation.sites().len(),
        species = relation.species().len(),
        "relation loaded"
    );
    Ok(relation)
}

fn column<'b>(
    batch: &'b RecordBatch,
    name: &str,
) -> Result<&'b arrow_array::ArrayRef, ParquetProviderError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| ParquetProviderError::ColumnNotFound {
            column: name.to_owned(),
        })
}

//! Relation and area readers.

use std::{fs::File, io::Read, path::Path};

use biogeonet_core::{AreaTable, Occurrence, OccurrenceRelation};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{info, instrument};

use crate::{errors::DelimitedProviderError, selector::FieldSelector};

/// Dialect of a delimited input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelimitedOptions {
    delimiter: u8,
    has_headers: bool,
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
        }
    }
}

impl DelimitedOptions {
    /// Comma-separated with a header row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks tab separation for `.tsv` and `.tab` files and commas otherwise.
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        let tabbed = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("tab"));
        let options = Self::default();
        if tabbed {
            options.with_delimiter(b'\t')
        } else {
            options
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether the first record is a header row.
    #[must_use]
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// Field delimiter.
    #[must_use]
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Whether the first record is a header row.
    #[must_use]
    pub fn has_headers(&self) -> bool {
        self.has_headers
    }

    fn open<R: Read>(&self, reader: R) -> csv::Reader<R> {
        ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(self.has_headers)
            .flexible(true)
            .trim(Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader)
    }
}

/// Columns holding the site, species and optional abundance of each
/// occurrence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationColumns {
    site: FieldSelector,
    species: FieldSelector,
    abundance: Option<FieldSelector>,
}

impl Default for RelationColumns {
    fn default() -> Self {
        Self::new(FieldSelector::Position(0), FieldSelector::Position(1))
    }
}

impl RelationColumns {
    /// Selects the site and species columns; no abundance column.
    #[must_use]
    pub fn new(site: FieldSelector, species: FieldSelector) -> Self {
        Self {
            site,
            species,
            abundance: None,
        }
    }

    /// Adds an abundance column.
    #[must_use]
    pub fn with_abundance(mut self, abundance: FieldSelector) -> Self {
        self.abundance = Some(abundance);
        self
    }

    /// Site column.
    #[must_use]
    pub fn site(&self) -> &FieldSelector {
        &self.site
    }

    /// Species column.
    #[must_use]
    pub fn species(&self) -> &FieldSelector {
        &self.species
    }

    /// Abundance column, if any.
    #[must_use]
    pub fn abundance(&self) -> Option<&FieldSelector> {
        self.abundance.as_ref()
    }
}

/// Columns holding the site and area of each area-table row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AreaColumns {
    site: FieldSelector,
    area: FieldSelector,
}

impl Default for AreaColumns {
    fn default() -> Self {
        Self::new(FieldSelector::Position(0), FieldSelector::Position(1))
    }
}

impl AreaColumns {
    /// Selects the site and area columns.
    #[must_use]
    pub fn new(site: FieldSelector, area: FieldSelector) -> Self {
        Self { site, area }
    }
}

/// Reads an occurrence relation.
///
/// Rows keep their input order. An empty abundance field leaves the row
/// unweighted.
///
/// # Errors
/// Returns [`DelimitedProviderError`] when a column cannot be resolved, a
/// field is empty or not a valid number, the input has no data rows, or
/// the CSV reader fails.
///
/// # Examples
/// ```
/// use biogeonet_providers_delimited::{
///     DelimitedOptions, FieldSelector, RelationColumns, read_relation,
/// };
///
/// let text = "site,species,abundance\nA,Sp1,10\nB,Sp1,\n";
/// let columns = RelationColumns::new("site".parse()?, "species".parse()?)
///     .with_abundance(FieldSelector::Position(2));
/// let relation = read_relation(text.as_bytes(), &columns, &DelimitedOptions::default())?;
/// assert_eq!(relation.sites(), ["A", "B"]);
/// assert_eq!(relation.rows()[1].weight(), 1.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "delimited.read_relation",
    err,
    skip(reader, columns, options),
    fields(site = %columns.site, species = %columns.species),
)]
pub fn read_relation<R: Read>(
    reader: R,
    columns: &RelationColumns,
    options: &DelimitedOptions,
) -> Result<OccurrenceRelation, DelimitedProviderError> {
    let mut csv = options.open(reader);
    let headers = headers_of(&mut csv, options)?;
    let site = columns.site.resolve(headers.as_ref())?;
    let species = columns.species.resolve(headers.as_ref())?;
    let abundance = columns
        .abundance
        .as_ref()
        .map(|selector| selector.resolve(headers.as_ref()))
        .transpose()?;

    let mut rows = Vec::new();
    for record in csv.records() {
        let record = record?;
        let line = line_of(&record);
        let row = Occurrence::new(
            label(&record, site, line, "site")?,
            label(&record, species, line, "species")?,
        );
        let weight = match abundance {
            Some(column) => number(&record, column, line, "abundance")?,
            None => None,
        };
        rows.push(match weight {
            Some(value) => row.with_abundance(value),
            None => row,
        });
    }
    if rows.is_empty() {
        return Err(DelimitedProviderError::EmptyInput);
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

/// Opens `path` and reads an occurrence relation from it.
///
/// # Errors
/// Returns [`DelimitedProviderError::Io`] when the file cannot be opened,
/// and otherwise fails as [`read_relation`].
pub fn read_relation_path(
    path: impl AsRef<Path>,
    columns: &RelationColumns,
    options: &DelimitedOptions,
) -> Result<OccurrenceRelation, DelimitedProviderError> {
    let file = File::open(path)?;
    read_relation(file, columns, options)
}

/// Reads a per-site area table. A site listed twice keeps its last area.
///
/// # Errors
/// Returns [`DelimitedProviderError`] when a column cannot be resolved, an
/// area is missing or invalid, or the CSV reader fails.
#[instrument(name = "delimited.read_areas", err, skip(reader, columns, options))]
pub fn read_areas<R: Read>(
    reader: R,
    columns: &AreaColumns,
    options: &DelimitedOptions,
) -> Result<AreaTable, DelimitedProviderError> {
    let mut csv = options.open(reader);
    let headers = headers_of(&mut csv, options)?;
    let site = columns.site.resolve(headers.as_ref())?;
    let area = columns.area.resolve(headers.as_ref())?;

    let mut table = AreaTable::new();
    for record in csv.records() {
        let record = record?;
        let line = line_of(&record);
        let name = label(&record, site, line, "site")?;
        let value = number(&record, area, line, "area")?
            .ok_or(DelimitedProviderError::EmptyField { field: "area", line })?;
        table.insert(name, value);
    }
    info!(sites = table.len(), "areas loaded");
    Ok(table)
}

/// Opens `path` and reads a per-site area table from it.
///
/// # Errors
/// Returns [`DelimitedProviderError::Io`] when the file cannot be opened,
/// and otherwise fails as [`read_areas`].
pub fn read_areas_path(
    path: impl AsRef<Path>,
    columns: &AreaColumns,
    options: &DelimitedOptions,
) -> Result<AreaTable, DelimitedProviderError> {
    let file = File::open(path)?;
    read_areas(file, columns, options)
}

fn headers_of<R: Read>(
    csv: &mut csv::Reader<R>,
    options: &DelimitedOptions,
) -> Result<Option<StringRecord>, DelimitedProviderError> {
    if options.has_headers {
        Ok(Some(csv.headers()?.clone()))
    } else {
        Ok(None)
    }
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, csv::Position::line)
}

fn field<'r>(
    record: &'r StringRecord,
    position: usize,
    line: u64,
) -> Result<&'r str, DelimitedProviderError> {
    record
        .get(position)
        .ok_or(DelimitedProviderError::PositionOutOfRange {
            position,
            width: record.len(),
            line,
        })
}

fn label(
    record: &StringRecord,
    position: usize,
    line: u64,
    role: &'static str,
) -> Result<String, DelimitedProviderError> {
    let value = field(record, position, line)?;
    if value.is_empty() {
        return Err(DelimitedProviderError::EmptyField { field: role, line });
    }
    Ok(value.to_owned())
}

fn number(
    record: &StringRecord,
    position: usize,
    line: u64,
    role: &'static str,
) -> Result<Option<f64>, DelimitedProviderError> {
    let raw = field(record, position, line)?;
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(Some(value)),
        _ => Err(DelimitedProviderError::InvalidNumber {
            field: role,
            value: raw.to_owned(),
            line,
        }),
    }
}

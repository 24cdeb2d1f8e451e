//! Helpers turning Arrow columns into relation fields.
use arrow_array::{
    Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray, UInt32Array, UInt64Array,
};
use arrow_schema::DataType;

use crate::errors::ParquetProviderError;

/// Trimmed labels of a `Utf8` or `LargeUtf8` column.
pub(crate) fn labels(
    array: &ArrayRef,
    column: &str,
    start_row: usize,
) -> Result<Vec<String>, ParquetProviderError> {
    match array.data_type() {
        DataType::Utf8 => collect_labels(downcast::<StringArray>(array, column)?.iter(), column, start_row),
        DataType::LargeUtf8 => collect_labels(
            downcast::<LargeStringArray>(array, column)?.iter(),
            column,
            start_row,
        ),
        other => Err(ParquetProviderError::InvalidColumnType {
            column: column.to_owned(),
            actual: other.clone(),
        }),
    }
}

fn collect_labels<'a>(
    values: impl Iterator<Item = Option<&'a str>>,
    column: &str,
    start_row: usize,
) -> Result<Vec<String>, ParquetProviderError> {
    values
        .enumerate()
        .map(|(offset, value)| match value.map(str::trim) {
            Some(label) if !label.is_empty() => Ok(label.to_owned()),
            _ => Err(ParquetProviderError::NullValue {
                column: column.to_owned(),
                row: start_row + offset,
            }),
        })
        .collect()
}

/// Abundances of a numeric column; nulls leave the row unweighted.
pub(crate) fn abundances(
    array: &ArrayRef,
    column: &str,
    start_row: usize,
) -> Result<Vec<Option<f64>>, ParquetProviderError> {
    let values: Vec<Option<f64>> = match array.data_type() {
        DataType::Float64 => downcast::<Float64Array>(array, column)?.iter().collect(),
        DataType::Float32 => downcast::<Float32Array>(array, column)?
            .iter()
            .map(|value| value.map(f64::from))
            .collect(),
        DataType::Int32 => downcast::<Int32Array>(array, column)?
            .iter()
            .map(|value| value.map(f64::from))
            .collect(),
        DataType::UInt32 => downcast::<UInt32Array>(array, column)?
            .iter()
            .map(|value| value.map(f64::from))
            .collect(),
        DataType::Int64 => downcast::<Int64Array>(array, column)?
            .iter()
            .map(|value| value.map(|count| count as f64))
            .collect(),
        DataType::UInt64 => downcast::<UInt64Array>(array, column)?
            .iter()
            .map(|value| value.map(|count| count as f64))
            .collect(),
        other => {
            return Err(ParquetProviderError::InvalidColumnType {
                column: column.to_owned(),
                actual: other.clone(),
            });
        }
    };
    if let Some((offset, value)) = values
        .iter()
        .enumerate()
        .find_map(|(offset, value)| value.filter(|v| !v.is_finite() || *v < 0.0).map(|v| (offset, v)))
    {
        return Err(ParquetProviderError::InvalidAbundance {
            row: start_row + offset,
            value,
        });
    }
    Ok(values)
}

fn downcast<'a, T: Array + 'static>(
    array: &'a ArrayRef,
    column: &str,
) -> Result<&'a T, ParquetProviderError> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| ParquetProviderError::InvalidColumnType {
            column: column.to_owned(),
            actual: array.data_type().clone(),
        })
}

use arrow_array::{ArrayRef, Float64Array, Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use bytes::Bytes;
use parquet::arrow::arrow_writer::ArrowWriter;
use std::sync::Arc;

pub(crate) const SCENARIO: [(&str, &str, f64); 5] = [
    ("A", "Sp1", 10.0),
    ("A", "Sp2", 15.0),
    ("A", "Sp3", 3.0),
    ("B", "Sp1", 1.0),
    ("B", "Sp4", 12.0),
];

pub(crate) fn labels_array(values: &[Option<&str>]) -> ArrayRef {
    Arc::new(StringArray::from(values.to_vec()))
}

/// A batch with `site`, `species` and float `abundance` columns.
pub(crate) fn scenario_batch() -> RecordBatch {
    let sites: Vec<Option<&str>> = SCENARIO.iter().map(|row| Some(row.0)).collect();
    let species: Vec<Option<&str>> = SCENARIO.iter().map(|row| Some(row.1)).collect();
    let abundance: Vec<Option<f64>> = SCENARIO.iter().map(|row| Some(row.2)).collect();
    RecordBatch::try_from_iter([
        ("site", labels_array(&sites)),
        ("species", labels_array(&species)),
        ("abundance", Arc::new(Float64Array::from(abundance)) as ArrayRef),
    ])
    .expect("scenario batch is well formed")
}

/// A batch whose abundance column holds integer counts.
pub(crate) fn integer_batch(counts: &[Option<i64>]) -> RecordBatch {
    let schema = Schema::new(vec![
        Field::new("plot", DataType::Utf8, false),
        Field::new("taxon", DataType::Utf8, false),
        Field::new("count", DataType::Int64, true),
    ]);
    let plots: Vec<Option<&str>> = counts.iter().map(|_| Some("P")).collect();
    let taxa: Vec<Option<String>> = (0..counts.len()).map(|i| Some(format!("T{i}"))).collect();
    RecordBatch::try_new(
        Arc::new(schema),
        vec![
            labels_array(&plots),
            Arc::new(StringArray::from(taxa)) as ArrayRef,
            Arc::new(Int64Array::from(counts.to_vec())) as ArrayRef,
        ],
    )
    .expect("integer batch is well formed")
}

/// Serialises batches into an in-memory Parquet file.
pub(crate) fn write_parquet(batches: &[RecordBatch]) -> Bytes {
    let schema = batches
        .first()
        .expect("at least one batch is required")
        .schema();
    let mut buffer = Vec::new();
    {
        let mut writer =
            ArrowWriter::try_new(&mut buffer, schema, None).expect("writer must initialise");
        for batch in batches {
            writer.write(batch).expect("batch must be written");
        }
        writer.close().expect("writer must close");
    }
    Bytes::from(buffer)
}

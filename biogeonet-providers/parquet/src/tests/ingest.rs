use super::support::labels_array;
use super::ParquetProviderError;
use crate::ingest::{abundances, labels};
use arrow_array::{ArrayRef, BooleanArray, Float32Array, LargeStringArray, UInt32Array};
use rstest::rstest;
use std::sync::Arc;

#[rstest]
fn labels_are_trimmed() {
    let array = labels_array(&[Some(" A "), Some("B")]);
    assert_eq!(labels(&array, "site", 0).expect("labels"), ["A", "B"]);
}

#[rstest]
fn large_utf8_labels_are_accepted() {
    let array: ArrayRef = Arc::new(LargeStringArray::from(vec!["Sp1", "Sp2"]));
    assert_eq!(labels(&array, "species", 0).expect("labels"), ["Sp1", "Sp2"]);
}

#[rstest]
#[case(&[Some("A"), None], 11)]
#[case(&[Some("A"), Some("  ")], 11)]
fn blank_labels_report_absolute_row(#[case] values: &[Option<&str>], #[case] row: usize) {
    let array = labels_array(values);
    let err = labels(&array, "site", 10).expect_err("blank label must fail");
    assert!(matches!(
        err,
        ParquetProviderError::NullValue { column, row: found } if column == "site" && found == row
    ));
}

#[rstest]
fn non_string_labels_are_rejected() {
    let array: ArrayRef = Arc::new(BooleanArray::from(vec![true]));
    let err = labels(&array, "site", 0).expect_err("booleans are not labels");
    assert!(matches!(err, ParquetProviderError::InvalidColumnType { .. }));
}

#[rstest]
fn numeric_abundances_widen_to_f64() {
    let floats: ArrayRef = Arc::new(Float32Array::from(vec![Some(1.5), None]));
    assert_eq!(abundances(&floats, "w", 0).expect("floats"), [Some(1.5), None]);
    let counts: ArrayRef = Arc::new(UInt32Array::from(vec![3, 0]));
    assert_eq!(abundances(&counts, "w", 0).expect("counts"), [Some(3.0), Some(0.0)]);
}

#[rstest]
#[case(-1.0)]
#[case(f32::NAN)]
#[case(f32::INFINITY)]
fn invalid_abundances_are_rejected(#[case] value: f32) {
    let array: ArrayRef = Arc::new(Float32Array::from(vec![1.0, value]));
    let err = abundances(&array, "w", 4).expect_err("value must be rejected");
    assert!(matches!(err, ParquetProviderError::InvalidAbundance { row: 5, .. }));
}

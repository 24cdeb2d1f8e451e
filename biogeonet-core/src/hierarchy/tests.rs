//! Unit tests for tree parsing, level materialization and leaf resolution.

use proptest::{collection::vec, prelude::*};
use rstest::rstest;

use crate::{
    HierarchyError, HierarchyPath, LevelId, TreeParseOptions, TreeRecord, materialize_levels,
    parse_tree, resolve_leaf_names, test_utils::suite_proptest_config,
};

use biogeonet_test_support::{fixtures, tracing::capture};

fn lvl(index: usize) -> LevelId {
    LevelId::new(index).expect("level index must be non-zero")
}

fn record(path: &[&str], name: &str, id: u64) -> TreeRecord {
    let path = HierarchyPath::from_segments(path.iter().copied()).expect("path must be non-empty");
    TreeRecord::new(path, 0.0, name, id)
}

#[test]
fn parses_scenario_tree() {
    let tree = parse_tree(fixtures::SCENARIO_TREE, &TreeParseOptions::default())
        .expect("scenario tree must parse");
    assert_eq!(tree.records().len(), 6);
    assert_eq!(tree.depth(), 1);
    assert_eq!(tree.header().codelength(), Some(1.52));
    assert_eq!(tree.header().comments().len(), 2);
    assert_eq!(tree.records()[4].name(), "B");
    assert_eq!(tree.records()[4].node_id(), 5);
    assert!((tree.records()[0].code_length() - 0.25).abs() < f64::EPSILON);
}

#[test]
fn first_line_is_skipped_even_without_hash() {
    let text = "path flow name node\n1:1 0.5 A 1\n";
    let tree = parse_tree(text, &TreeParseOptions::default()).expect("tree must parse");
    assert_eq!(tree.records().len(), 1);
    assert_eq!(tree.header().comments(), ["path flow name node"]);
}

#[test]
fn blank_lines_and_comments_are_ignored() {
    let text = "# header\n\n1 0.1 A 1\n# trailing comment\n\n2 0.1 B 2\n";
    let tree = parse_tree(text, &TreeParseOptions::default()).expect("tree must parse");
    assert_eq!(tree.records().len(), 2);
}

#[rstest]
#[case("")]
#[case("# header only\n")]
#[case("# header\n\n# comment\n")]
fn empty_input_is_rejected(#[case] text: &str) {
    let err = parse_tree(text, &TreeParseOptions::default()).expect_err("no records");
    assert!(matches!(err, HierarchyError::EmptyInput));
    assert_eq!(err.code().as_str(), "HIERARCHY_EMPTY_INPUT");
}

#[test]
fn malformed_token_aborts_the_whole_parse() {
    let text = "# header\n1:1 0.1 A 1\n1:x 0.1 B 2\n2:1 0.1 C 3\n";
    let err = parse_tree(text, &TreeParseOptions::default()).expect_err("parse must fail");
    match err {
        HierarchyError::MalformedToken { line, token } => {
            assert_eq!(line, 3);
            assert_eq!(token, "x");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn custom_delimiter_is_honoured() {
    let options = TreeParseOptions::default().with_delimiter('/');
    let tree = parse_tree("# h\n3/2/1 0.1 A 1\n", &options).expect("tree must parse");
    assert_eq!(tree.records()[0].path().segments(), ["3", "2", "1"]);
}

#[test]
fn read_tree_records_span_fields() {
    let (result, layer) = capture(|| {
        parse_tree(fixtures::NESTED_TREE, &TreeParseOptions::default())
    });
    result.expect("nested tree must parse");
    let span = layer.span("core.read_tree").expect("span must be recorded");
    assert_eq!(span.field("records"), Some("9"));
    assert_eq!(span.field("depth"), Some("3"));
    assert_eq!(layer.events_with_message("tree parsed").len(), 1);
}

#[test]
fn materializes_padded_levels() {
    let records = [
        record(&["1", "2", "3"], "A", 1),
        record(&["1", "2"], "B", 2),
        record(&["2"], "C", 3),
    ];
    let matrix = materialize_levels(&records);
    assert_eq!(matrix.depth(), 3);
    assert_eq!(matrix.value(0, lvl(3)), Some("1.2.3"));
    assert_eq!(matrix.value(1, lvl(2)), Some("1.2"));
    assert_eq!(matrix.value(1, lvl(3)), None);
    assert_eq!(matrix.value(2, lvl(1)), Some("2"));
    assert_eq!(matrix.value(2, lvl(2)), None);
}

#[test]
fn arbitrary_segment_labels_are_kept_verbatim() {
    let records = [record(&["north", "b"], "A", 1), record(&["south"], "B", 2)];
    let matrix = materialize_levels(&records);
    assert_eq!(matrix.value(0, lvl(2)), Some("north.b"));
    assert_eq!(matrix.column(lvl(1)), [Some("north".to_owned()), Some("south".to_owned())]);
}

#[rstest]
#[case(&["1", "1"], 3, "Sp", 3)]
#[case(&["1", "1", "2"], 3, "Sp", 3)]
#[case(&["4"], 3, "Sp", 2)]
fn leaf_name_lands_in_expected_column(
    #[case] path: &[&str],
    #[case] depth: usize,
    #[case] name: &str,
    #[case] expected_level: usize,
) {
    let mut records = vec![record(path, name, 1)];
    // Pad the table to the requested global depth.
    let filler: Vec<String> = (1..=depth).map(|i| i.to_string()).collect();
    records.push(TreeRecord::new(
        HierarchyPath::from_segments(filler).expect("non-empty"),
        0.0,
        "filler",
        2,
    ));
    let matrix = materialize_levels(&records);
    let resolved = resolve_leaf_names(&matrix, &records);
    assert_eq!(resolved.value(0, lvl(expected_level)), Some(name));
    for level in (1..=depth).filter(|&level| level != expected_level) {
        assert_eq!(resolved.value(0, lvl(level)), matrix.value(0, lvl(level)));
    }
}

#[test]
fn resolution_leaves_input_untouched() {
    let records = [record(&["1"], "A", 1)];
    let matrix = materialize_levels(&records);
    let resolved = resolve_leaf_names(&matrix, &records);
    assert_eq!(matrix.value(0, lvl(1)), Some("1"));
    assert_eq!(resolved.value(0, lvl(1)), Some("A"));
}

fn path_strategy() -> impl Strategy<Value = Vec<u8>> {
    vec(1u8..4, 1..5)
}

fn tree_strategy() -> impl Strategy<Value = Vec<TreeRecord>> {
    vec(path_strategy(), 1..24).prop_map(|paths| {
        paths
            .into_iter()
            .enumerate()
            .map(|(index, segments)| {
                let path = HierarchyPath::from_segments(segments.iter().map(u8::to_string))
                    .expect("strategy yields non-empty paths");
                TreeRecord::new(path, 0.0, format!("node_{index}"), index as u64 + 1)
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn equal_levels_imply_equal_prefixes(records in tree_strategy()) {
        let matrix = materialize_levels(&records);
        for a in 0..matrix.len() {
            for b in 0..matrix.len() {
                for i in 1..=matrix.depth() {
                    let value_a = matrix.value(a, lvl(i));
                    if value_a.is_some() && value_a == matrix.value(b, lvl(i)) {
                        for j in 1..i {
                            prop_assert_eq!(matrix.value(a, lvl(j)), matrix.value(b, lvl(j)));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn defined_levels_stop_at_native_depth(records in tree_strategy()) {
        let matrix = materialize_levels(&records);
        for (row, record) in records.iter().enumerate() {
            for i in 1..=matrix.depth() {
                prop_assert_eq!(matrix.value(row, lvl(i)).is_some(), i <= record.path().depth());
            }
        }
    }

    #[test]
    fn resolution_rewrites_exactly_one_column(records in tree_strategy()) {
        let matrix = materialize_levels(&records);
        let resolved = resolve_leaf_names(&matrix, &records);
        for (row, record) in records.iter().enumerate() {
            let changed: Vec<usize> = (1..=matrix.depth())
                .filter(|&i| matrix.value(row, lvl(i)) != resolved.value(row, lvl(i)))
                .collect();
            prop_assert_eq!(changed.len(), 1);
            prop_assert_eq!(resolved.value(row, lvl(changed[0])), Some(record.name()));
        }
    }
}

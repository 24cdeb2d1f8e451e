//! GDF writer behaviour over the scenario partition.
use biogeonet_core::{
    ColoringConfig, LevelId, OccurrenceRelation, PartitionTable, TreeParseOptions,
    color_clusters, parse_tree,
};
use biogeonet_providers_network::{GdfCounts, GdfOptions, NetworkFormatError, write_gdf};
use biogeonet_test_support::fixtures;
use rstest::{fixture, rstest};

#[fixture]
fn scenario() -> (PartitionTable, OccurrenceRelation) {
    let options = TreeParseOptions::default().with_leaf_names(false);
    let tree = parse_tree(fixtures::SCENARIO_TREE, &options).expect("scenario tree parses");
    let relation = OccurrenceRelation::from_triples(
        fixtures::SCENARIO_RELATION
            .iter()
            .map(|&(site, species, abundance)| (site, species, Some(abundance))),
    );
    (PartitionTable::from_tree(&tree, &options), relation)
}

fn coloured(table: &PartitionTable, relation: &OccurrenceRelation) -> PartitionTable {
    let config = ColoringConfig::builder().build().expect("defaults are valid");
    let coloring =
        color_clusters(table, relation, LevelId::FIRST, &config).expect("two clusters fit");
    let column = coloring.to_column(table).expect("level exists");
    table
        .with_column(coloring.column_name(), column)
        .expect("column is new")
}

fn render(
    table: &PartitionTable,
    relation: &OccurrenceRelation,
    options: &GdfOptions,
) -> (String, GdfCounts) {
    let mut out = Vec::new();
    let counts = write_gdf(table, relation, options, &mut out).expect("gdf must be written");
    (String::from_utf8(out).expect("utf-8"), counts)
}

#[rstest]
fn writes_levels_colours_and_edges(scenario: (PartitionTable, OccurrenceRelation)) {
    let (table, relation) = scenario;
    let table = coloured(&table, &relation);
    let options = GdfOptions::new().with_color_column("color_lvl1");
    let (text, counts) = render(&table, &relation, &options);
    assert_eq!(
        text,
        "\
nodedef>name VARCHAR,label VARCHAR,lvl1 VARCHAR,color VARCHAR
1,A,1,'228,26,28'
2,Sp1,1,'228,26,28'
3,Sp2,1,'228,26,28'
4,Sp3,1,'228,26,28'
5,B,2,'77,175,74'
6,Sp4,2,'77,175,74'
edgedef>node1 VARCHAR,node2 VARCHAR,weight INTEGER
1,2,10
1,3,15
1,4,3
5,2,1
5,6,12
"
    );
    assert_eq!(
        counts,
        GdfCounts {
            nodes: 6,
            edges: 5,
            skipped_edges: 0,
        }
    );
}

#[rstest]
fn raw_colours_and_direction(scenario: (PartitionTable, OccurrenceRelation)) {
    let (table, relation) = scenario;
    let table = coloured(&table, &relation);
    let options = GdfOptions::new()
        .with_color_column("color_lvl1")
        .with_raw_colors(true)
        .with_directed(true);
    let (text, _) = render(&table, &relation, &options);
    assert!(text.contains("\n1,A,1,#E41A1C\n"), "{text}");
    assert!(text.contains("directed BOOLEAN\n1,2,10,true\n"), "{text}");
}

#[rstest]
fn rows_outside_the_hierarchy_are_skipped(scenario: (PartitionTable, OccurrenceRelation)) {
    let (table, _) = scenario;
    let relation = OccurrenceRelation::from_triples([("A", "Sp1", None), ("C", "Sp1", None)]);
    let (text, counts) = render(&table, &relation, &GdfOptions::new());
    assert_eq!(counts.edges, 1);
    assert_eq!(counts.skipped_edges, 1);
    assert!(text.ends_with("edgedef>node1 VARCHAR,node2 VARCHAR,weight INTEGER\n1,2,1\n"));
}

#[rstest]
fn missing_colour_column_is_reported(scenario: (PartitionTable, OccurrenceRelation)) {
    let (table, relation) = scenario;
    let options = GdfOptions::new().with_color_column("color_lvl3");
    let err = write_gdf(&table, &relation, &options, Vec::new()).expect_err("column is absent");
    assert!(matches!(err, NetworkFormatError::ColorColumn { name } if name == "color_lvl3"));
}

//! Canonical input fixtures shared by unit, integration and CLI tests.
//!
//! Fixtures are plain text and tuples so this crate stays independent of the
//! library crates that consume them.

/// The two-cluster scenario relation as `(site, species, abundance)`.
pub const SCENARIO_RELATION: [(&str, &str, f64); 5] = [
    ("A", "Sp1", 10.0),
    ("A", "Sp2", 15.0),
    ("A", "Sp3", 3.0),
    ("B", "Sp1", 1.0),
    ("B", "Sp4", 12.0),
];

/// Tree file placing `A`, `Sp1`, `Sp2`, `Sp3` in cluster `1` and `B`, `Sp4`
/// in cluster `2`. Every path has depth one.
pub const SCENARIO_TREE: &str = "\
# v1.7.3 --tree --two-level
# codelength 1.52 bits
1 0.25 \"A\" 1
1 0.20 \"Sp1\" 2
1 0.15 \"Sp2\" 3
1 0.10 \"Sp3\" 4
2 0.20 \"B\" 5
2 0.10 \"Sp4\" 6
";

/// The scenario relation as comma-separated text with a header row.
pub const SCENARIO_RELATION_CSV: &str = "\
site,species,abundance
A,Sp1,10
A,Sp2,15
A,Sp3,3
B,Sp1,1
B,Sp4,12
";

/// Per-site areas for the scenario relation.
pub const SCENARIO_AREAS_CSV: &str = "\
site,area
A,2.5
B,4
";

/// A three-level tree over four sites and five species, with nodes of
/// varying native depth.
pub const NESTED_TREE: &str = "\
# v1.7.3 --tree
1:1:1 0.10 \"S1\" 1
1:1:2 0.08 \"S2\" 2
1:1:3 0.07 \"P1\" 3
1:2 0.06 \"P2\" 4
1:3:1 0.05 \"S3\" 5
1:3:2 0.04 \"P3\" 6
2:1 0.09 \"S4\" 7
2:2 0.05 \"P4\" 8
2:3 0.03 \"P5\" 9
";

/// Relation matching [`NESTED_TREE`].
pub const NESTED_RELATION: [(&str, &str, f64); 10] = [
    ("S1", "P1", 1.0),
    ("S1", "P2", 2.0),
    ("S2", "P1", 1.0),
    ("S2", "P3", 1.0),
    ("S3", "P3", 3.0),
    ("S3", "P2", 1.0),
    ("S4", "P4", 5.0),
    ("S4", "P5", 1.0),
    ("S4", "P1", 1.0),
    ("S3", "P4", 2.0),
];

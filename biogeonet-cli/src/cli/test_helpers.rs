//! Small helpers shared across CLI tests.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use biogeonet_test_support::fixtures::{NESTED_RELATION, NESTED_TREE};
use tempfile::TempDir;

use super::{Cli, CliError, RelationArgs, TreeArgs, run_cli};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn create_text_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    let mut file = File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    Ok(path)
}

/// Writes the nested tree and its relation as `tree.txt` and
/// `relation.csv`.
pub(super) fn nested_inputs(dir: &TempDir) -> io::Result<(PathBuf, PathBuf)> {
    let tree = create_text_file(dir, "tree.txt", NESTED_TREE)?;
    let mut csv = String::from("site,species,abundance\n");
    for (site, species, abundance) in NESTED_RELATION {
        csv.push_str(&format!("{site},{species},{abundance}\n"));
    }
    let relation = create_text_file(dir, "relation.csv", &csv)?;
    Ok((tree, relation))
}

pub(super) fn tree_args(path: PathBuf) -> TreeArgs {
    TreeArgs {
        tree: path,
        tree_delimiter: ':',
        keep_leaf_ids: false,
    }
}

pub(super) fn named_fields() -> RelationArgs {
    RelationArgs {
        site_field: Some("site".parse().expect("selectors always parse")),
        species_field: Some("species".parse().expect("selectors always parse")),
        ..RelationArgs::default()
    }
}

pub(super) fn read_lines(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(text) => text.lines().map(ToOwned::to_owned).collect(),
        Err(err) => panic!("failed to read `{}`: {err}", path.display()),
    }
}

pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}

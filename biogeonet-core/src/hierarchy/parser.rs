//! Line-level parsing of hierarchical clustering tree files.
//!
//! A tree file starts with one header line, followed by records of the form
//! `<path> <quality> <name> <id>`, where `path` is `int(:int)*`. Further
//! lines starting with `#` are treated as comments; a comment mentioning
//! `codelength` has its numeric value captured.

use std::io::BufRead;

use crate::error::HierarchyError;

use super::{HierarchyPath, TreeHeader, TreeRecord};

/// Reads every record, aborting on the first malformed line.
pub(super) fn read_records<R: BufRead>(
    reader: R,
    delimiter: char,
) -> Result<(TreeHeader, Vec<TreeRecord>), HierarchyError> {
    let mut header = TreeHeader::default();
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        let trimmed = line.trim();
        if index == 0 || trimmed.starts_with('#') {
            header.absorb(trimmed);
            continue;
        }
        if trimmed.is_empty() {
            continue;
        }
        records.push(parse_record(trimmed, delimiter, number)?);
    }
    if records.is_empty() {
        return Err(HierarchyError::EmptyInput);
    }
    Ok((header, records))
}

fn parse_record(line: &str, delimiter: char, number: usize) -> Result<TreeRecord, HierarchyError> {
    let tokens = tokenize(line, number)?;
    let (path, quality, name, id) = match tokens.as_slice() {
        [path, quality, name @ .., id] if !name.is_empty() => (path, quality, name, id),
        [_] => return Err(missing(number, "quality")),
        [_, _] => return Err(missing(number, "name")),
        _ => return Err(missing(number, "node id")),
    };

    let path = parse_path(path, delimiter, number)?;
    let code_length = quality
        .parse::<f64>()
        .map_err(|_| invalid(number, "quality", quality))?;
    let node_id = id
        .parse::<u64>()
        .map_err(|_| invalid(number, "node id", id))?;
    let name = name.join(" ");

    Ok(TreeRecord {
        path,
        code_length,
        name,
        node_id,
    })
}

/// Splits a path like `2:3:1` into validated segments.
pub(super) fn parse_path(
    raw: &str,
    delimiter: char,
    number: usize,
) -> Result<HierarchyPath, HierarchyError> {
    let mut segments = Vec::new();
    for token in raw.split(delimiter) {
        if token.is_empty() {
            return Err(HierarchyError::EmptyPath {
                line: number,
                path: raw.to_owned(),
            });
        }
        match token.parse::<u64>() {
            Ok(value) if value > 0 => segments.push(value.to_string()),
            _ => {
                return Err(HierarchyError::MalformedToken {
                    line: number,
                    token: token.to_owned(),
                });
            }
        }
    }
    Ok(HierarchyPath(segments))
}

/// Splits on whitespace; double-quoted names may contain spaces.
fn tokenize(line: &str, number: usize) -> Result<Vec<String>, HierarchyError> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();
    while let Some(&next) = chars.peek() {
        if next.is_whitespace() {
            chars.next();
            continue;
        }
        if next == '"' {
            chars.next();
            let mut text = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '"' {
                    closed = true;
                    break;
                }
                text.push(c);
            }
            if !closed {
                return Err(HierarchyError::UnterminatedQuote { line: number });
            }
            tokens.push(text);
            continue;
        }
        let mut text = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                break;
            }
            text.push(c);
            chars.next();
        }
        tokens.push(text);
    }
    Ok(tokens)
}

fn missing(line: usize, field: &'static str) -> HierarchyError {
    HierarchyError::MissingField { line, field }
}

fn invalid(line: usize, field: &'static str, value: &str) -> HierarchyError {
    HierarchyError::InvalidNumber {
        line,
        field,
        value: value.to_owned(),
    }
}

/// Extracts the value following a `codelength` keyword in a comment line.
pub(super) fn codelength_of(comment: &str) -> Option<f64> {
    let lowered = comment.to_ascii_lowercase();
    let position = lowered.find("codelength")?;
    let rest = comment.get(position + "codelength".len()..)?;
    rest.split(|c: char| c.is_whitespace() || c == '=' || c == ':')
        .filter(|part| !part.is_empty())
        .find_map(|part| {
            part.trim_end_matches(|c: char| !c.is_ascii_digit())
                .parse::<f64>()
                .ok()
        })
}

//! Column selection by header name or zero-based position.

use std::{convert::Infallible, fmt, str::FromStr};

use csv::StringRecord;

use crate::errors::DelimitedProviderError;

/// Selects one column of a delimited input.
///
/// Parsing a selector treats a plain unsigned integer as a zero-based
/// position and anything else as a header name.
///
/// # Examples
/// ```
/// use biogeonet_providers_delimited::FieldSelector;
///
/// assert_eq!("2".parse::<FieldSelector>(), Ok(FieldSelector::Position(2)));
/// assert_eq!(
///     "species".parse::<FieldSelector>(),
///     Ok(FieldSelector::Name("species".into())),
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldSelector {
    /// Header name, matched exactly after trimming.
    Name(String),
    /// Zero-based column position.
    Position(usize),
}

impl FieldSelector {
    /// Resolves the selector to a column index.
    ///
    /// Positions are not checked here; records shorter than the position
    /// are rejected as they are read.
    pub(crate) fn resolve(
        &self,
        headers: Option<&StringRecord>,
    ) -> Result<usize, DelimitedProviderError> {
        match self {
            Self::Position(position) => Ok(*position),
            Self::Name(name) => {
                let headers = headers.ok_or_else(|| DelimitedProviderError::NameWithoutHeader {
                    name: name.clone(),
                })?;
                headers
                    .iter()
                    .position(|header| header.trim() == name)
                    .ok_or_else(|| DelimitedProviderError::ColumnNotFound { name: name.clone() })
            }
        }
    }
}

impl fmt::Display for FieldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Position(position) => write!(f, "{position}"),
        }
    }
}

impl FromStr for FieldSelector {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Ok(trimmed
            .parse::<usize>()
            .map_or_else(|_| Self::Name(trimmed.to_owned()), Self::Position))
    }
}

//! Delimited-text provider for occurrence relations and site areas.
//!
//! Reads comma- or tab-separated tables through the `csv` crate, selecting
//! the site, species, abundance and area columns by header name or by
//! zero-based position.

mod errors;
mod reader;
mod selector;

pub use errors::DelimitedProviderError;
pub use reader::{
    AreaColumns, DelimitedOptions, RelationColumns, read_areas, read_areas_path, read_relation,
    read_relation_path,
};
pub use selector::FieldSelector;

//! Network file formats for bipartite site–species relations.
//!
//! - Pajek `*Vertices`/`*Edges` files, the input of the external
//!   clustering tool, written and read back by [`write_pajek`] and
//!   [`read_pajek`].
//! - GDF graph-exchange files annotated with hierarchy levels and cluster
//!   colours, written by [`write_gdf`].

mod errors;
mod gdf;
mod pajek;

pub use errors::NetworkFormatError;
pub use gdf::{GdfCounts, GdfOptions, write_gdf};
pub use pajek::{NetworkCounts, read_pajek, write_pajek};

//! Benchmark support crate for biogeonet.
//!
//! Provides seeded synthetic site–species networks, with matching tree
//! files, and the parameter types used by the Criterion benchmarks for tree
//! parsing, cluster metrics and colouring.

pub mod error;
pub mod params;
pub mod source;

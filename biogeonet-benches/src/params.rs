//! Benchmark parameter types.

use std::fmt;

/// Size of a synthetic network benchmark run.
#[derive(Clone, Debug)]
pub struct NetworkBenchParams {
    /// Number of sites.
    pub sites: usize,
    /// Number of species.
    pub species: usize,
}

impl fmt::Display for NetworkBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sites={},species={}", self.sites, self.species)
    }
}

/// Size and level of a metrics or colouring benchmark run.
#[derive(Clone, Debug)]
pub struct LevelBenchParams {
    /// Number of sites.
    pub sites: usize,
    /// One-based level the computation runs at.
    pub level: usize,
}

impl fmt::Display for LevelBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sites={},lvl{}", self.sites, self.level)
    }
}

//! High-level runtime engine settings
//!
//! Selects the integration scheme, serial vs parallel aggregation, and the
//! neighbor-list options used when building and running a `Scenario`.

use crate::simulation::integrator::SchemeKind;

#[derive(Debug, Clone)]
pub struct Engine {
    pub scheme: SchemeKind,    // integration scheme
    pub parallel: bool,        // false = serial aggregation, true = rayon
    pub neighbors: bool,       // false = all-pairs, true = neighbor-list scoped
    pub r_verlet: f64,         // neighbor-list cutoff radius
    pub rebuild_period: usize, // steps between neighbor-list rebuilds
}

//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! driver scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – scheme and aggregation options
//! - [`ParametersConfig`] – numerical parameters and contact-law coefficients
//! - [`BodyConfig`]       – initial state for each particle
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   scheme: "velocity_verlet_half"  # or "forward_euler", "velocity_verlet"
//!   parallel: true
//!   neighbors: true
//!   r_verlet: 0.6                   # required when neighbors: true
//!   rebuild_period: 100             # steps between rebuilds
//!
//! parameters:
//!   t_end: 10.0       # total simulation time
//!   dt: 0.001         # fixed step size
//!   k: 1000.0         # contact stiffness
//!   m: 1.0            # particle mass
//!   g: 0.2            # pairwise attraction acceleration
//!   gamma_c: 0.05     # contact damping coefficient
//!   r_part: 0.1       # particle radius
//!
//! bodies:
//!   - x: [ -0.5, 0.0, 0.0 ]
//!     v: [  0.0, 0.0, 0.0 ]
//!   - x: [  0.5, 0.0, 0.0 ]
//!     v: [  0.0, 0.0, 0.0 ]
//! ```
//!
//! The scenario builder maps this configuration into the runtime structs
//! (`Engine`, `Parameters`, initial state buffers).

use serde::Deserialize;

/// Which integration scheme the engine advances the state with
#[derive(Deserialize, Debug, Clone, Copy)]
pub enum SchemeConfig {
    #[serde(rename = "forward_euler")] // first order, one force evaluation per step
    ForwardEuler,

    #[serde(rename = "velocity_verlet")] // symmetric form, two force evaluations per step
    VelocityVerlet,

    #[serde(rename = "velocity_verlet_half")] // leapfrog form, one force evaluation per step
    VelocityVerletHalf,
}

/// High-level engine configuration
#[derive(Deserialize, Debug)]
pub struct EngineConfig {
    pub scheme: SchemeConfig,          // time integration scheme
    pub parallel: bool,                // `true` - rayon-parallel force aggregation
    pub neighbors: bool,               // `true` - neighbor-list-scoped aggregation
    pub r_verlet: Option<f64>,         // neighbor-list cutoff radius
    pub rebuild_period: Option<usize>, // steps between neighbor-list rebuilds
}

/// Global numerical and contact-law parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub t_end: f64,   // time end
    pub dt: f64,      // time step size
    pub k: f64,       // contact stiffness
    pub m: f64,       // particle mass
    pub g: f64,       // pairwise attraction acceleration
    pub gamma_c: f64, // contact damping coefficient
    pub r_part: f64,  // particle radius
}

/// Configuration for a single particle's initial state
#[derive(Deserialize, Debug)]
pub struct BodyConfig {
    pub x: Vec<f64>, // initial position
    pub v: Vec<f64>, // initial velocity
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    pub bodies: Vec<BodyConfig>,
}

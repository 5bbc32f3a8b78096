pub mod benchmark;
pub mod configuration;
pub mod error;
pub mod simulation;

pub use error::{Error, Result};

pub use simulation::states::{Field, NVec2, NVec3};
pub use simulation::step_handler::{
    AdditiveRotationalStepHandler, AdditiveStepHandler, RotationalStepHandler, StepHandler,
};
pub use simulation::integrator::{Integrator, SchemeKind};
pub use simulation::forces::{
    BinaryAcceleration, Forcing, NeighborForce, NeighborScoped, PairwiseForce, UnaryAcceleration,
    UnaryForce,
};
pub use simulation::neighbors::NeighborList;
pub use simulation::system::System;
pub use simulation::rotational::{
    RotationalBinaryAcceleration, RotationalForcing, RotationalIntegrator, RotationalNeighborForce,
    RotationalPairwiseForce, RotationalSchemeKind, RotationalSystem, RotationalUnaryAcceleration,
    RotationalUnaryForce,
};
pub use simulation::engine::Engine;
pub use simulation::params::Parameters;
pub use simulation::scenario::{GranularContact, Scenario};

pub use configuration::config::{
    BodyConfig, EngineConfig, ParametersConfig, ScenarioConfig, SchemeConfig,
};

pub use benchmark::benchmark::{bench_forces, bench_step};

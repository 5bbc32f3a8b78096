pub mod states;
pub mod params;
pub mod engine;
pub mod step_handler;
pub mod integrator;
pub mod forces;
pub mod neighbors;
pub mod system;
pub mod rotational;
pub mod scenario;

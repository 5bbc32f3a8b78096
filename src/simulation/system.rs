//! Generic second-order system container.
//!
//! Owns the state buffers and the index space, wires a force aggregator into
//! the chosen integration scheme, and exposes one externally visible
//! operation: advance time by one step. The acceleration evaluator (inside
//! the aggregator) and the step handler are caller-owned and merely
//! borrowed; they must outlive the system.

use crate::error::{Error, Result};

use super::forces::{Forcing, NeighborScoped};
use super::integrator::{Integrator, SchemeKind};
use super::states::Field;
use super::step_handler::StepHandler;

pub struct System<'h, V: Field, F: Forcing<V>, S: StepHandler<V>> {
    x: Vec<V>,
    v: Vec<V>,
    a: Vec<V>,
    integrator: Integrator<V>,
    forces: F,
    handler: &'h S,
}

impl<'h, V, F, S> System<'h, V, F, S>
where
    V: Field,
    F: Forcing<V>,
    S: StepHandler<V>,
{
    /// Build a system from initial position and velocity buffers.
    ///
    /// The buffers must have equal length; the length is fixed for the
    /// lifetime of the system. Schemes that need an initial acceleration
    /// (both Verlet forms) evaluate the aggregator once here, so the
    /// evaluator must be ready to be called at `t0`.
    pub fn new(
        x0: Vec<V>,
        v0: Vec<V>,
        t0: f64,
        scheme: SchemeKind,
        forces: F,
        handler: &'h S,
    ) -> Result<Self> {
        if x0.len() != v0.len() {
            return Err(Error::SizeMismatch {
                context: "System::new",
                lengths: vec![x0.len(), v0.len()],
            });
        }

        let n = x0.len();
        let mut sys = Self {
            x: x0,
            v: v0,
            a: vec![V::zeros(); n],
            integrator: Integrator::new(scheme, t0, n),
            forces,
            handler,
        };

        if sys.integrator.needs_initial_acceleration() {
            sys.forces
                .accumulate_accels(t0, &sys.x, &sys.v, &mut sys.a);
        }

        Ok(sys)
    }

    /// Advance the system by one time step of size `dt`.
    pub fn do_step(&mut self, dt: f64) {
        self.integrator.do_step(
            dt,
            &mut self.x,
            &mut self.v,
            &mut self.a,
            &self.forces,
            self.handler,
        );
    }

    pub fn get_x(&self) -> &[V] {
        &self.x
    }

    pub fn get_v(&self) -> &[V] {
        &self.v
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Current simulation time.
    pub fn time(&self) -> f64 {
        self.integrator.time()
    }

    pub fn forces(&self) -> &F {
        &self.forces
    }
}

impl<V, F, S> System<'_, V, F, S>
where
    V: Field,
    F: Forcing<V> + NeighborScoped<V>,
    S: StepHandler<V>,
{
    /// Re-scan particle positions and rebuild the aggregator's neighbor
    /// lists. The driver decides how often to call this.
    pub fn update_neighbor_list(&mut self) {
        self.forces.rebuild_neighbors(&self.x);
    }
}

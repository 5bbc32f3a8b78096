//! Rotational counterparts of the integrator, aggregators, and system.
//!
//! A rotating system carries an angle/angular-velocity pair next to the
//! linear state. The scheme structure is identical, applied to `(x, v, a)`
//! and `(theta, omega, alpha)` in lockstep; a single evaluator call produces
//! the linear and angular accelerations together.

use rayon::prelude::*;

use crate::error::{Error, Result};

use super::forces::NeighborScoped;
use super::neighbors::NeighborList;
use super::states::Field;
use super::step_handler::RotationalStepHandler;

/// Per-particle law producing `(linear, angular)` acceleration.
pub trait RotationalUnaryAcceleration<V: Field>: Send + Sync {
    fn compute_acceleration(
        &self,
        i: usize,
        x: &[V],
        v: &[V],
        theta: &[V],
        omega: &[V],
        t: f64,
    ) -> (V, V);
}

/// Per-pair law producing `(linear, angular)` acceleration contributions to
/// particle `i` from its interaction with `j`. The reciprocal pair `(j, i)`
/// is queried separately.
pub trait RotationalBinaryAcceleration<V: Field>: Send + Sync {
    fn compute_acceleration(
        &self,
        i: usize,
        j: usize,
        x: &[V],
        v: &[V],
        theta: &[V],
        omega: &[V],
        t: f64,
    ) -> (V, V);

    /// Optional per-particle external term, added once per particle.
    fn compute_external(
        &self,
        _i: usize,
        _x: &[V],
        _v: &[V],
        _theta: &[V],
        _omega: &[V],
        _t: f64,
    ) -> Option<(V, V)> {
        None
    }
}

/// One complete evaluation of both acceleration buffers.
pub trait RotationalForcing<V: Field> {
    #[allow(clippy::too_many_arguments)]
    fn accumulate_accels(
        &self,
        t: f64,
        x: &[V],
        v: &[V],
        theta: &[V],
        omega: &[V],
        a: &mut [V],
        alpha: &mut [V],
    );
}

/// Rotational integration scheme selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationalSchemeKind {
    ForwardEuler,
    VelocityVerletHalf,
}

enum RotationalScheme {
    ForwardEuler,
    VelocityVerletHalf { primed: bool },
}

/// Simulation clock plus scheme state for a rotational system.
pub struct RotationalIntegrator {
    t: f64,
    scheme: RotationalScheme,
}

impl RotationalIntegrator {
    pub fn new(kind: RotationalSchemeKind, t0: f64) -> Self {
        let scheme = match kind {
            RotationalSchemeKind::ForwardEuler => RotationalScheme::ForwardEuler,
            RotationalSchemeKind::VelocityVerletHalf => {
                RotationalScheme::VelocityVerletHalf { primed: false }
            }
        };
        Self { t: t0, scheme }
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    pub(crate) fn needs_initial_acceleration(&self) -> bool {
        !matches!(self.scheme, RotationalScheme::ForwardEuler)
    }

    /// Advance linear and angular state by one step of size `dt`.
    #[allow(clippy::too_many_arguments)]
    pub fn do_step<V, F, S>(
        &mut self,
        dt: f64,
        x: &mut [V],
        v: &mut [V],
        a: &mut [V],
        theta: &mut [V],
        omega: &mut [V],
        alpha: &mut [V],
        forces: &F,
        handler: &S,
    ) where
        V: Field,
        F: RotationalForcing<V>,
        S: RotationalStepHandler<V>,
    {
        match &mut self.scheme {
            RotationalScheme::ForwardEuler => {
                forces.accumulate_accels(self.t, x, v, theta, omega, a, alpha);
                self.t += dt;

                for n in 0..x.len() {
                    let vn = v[n];
                    let an = a[n];
                    let omega_n = omega[n];
                    let alpha_n = alpha[n];

                    handler.increment_x(n, vn * dt + an * (0.5 * dt * dt), x, v, theta, omega);
                    handler.increment_v(n, an * dt, x, v, theta, omega);
                    handler.increment_theta(
                        n,
                        omega_n * dt + alpha_n * (0.5 * dt * dt),
                        x,
                        v,
                        theta,
                        omega,
                    );
                    handler.increment_omega(n, alpha_n * dt, x, v, theta, omega);
                }
            }
            RotationalScheme::VelocityVerletHalf { primed } => {
                // One-time backward half-kick on both velocity buffers
                if !*primed {
                    *primed = true;
                    for n in 0..x.len() {
                        let an = a[n];
                        let alpha_n = alpha[n];
                        handler.increment_v(n, an * (-0.5 * dt), x, v, theta, omega);
                        handler.increment_omega(n, alpha_n * (-0.5 * dt), x, v, theta, omega);
                    }
                    forces.accumulate_accels(self.t, x, v, theta, omega, a, alpha);
                }

                for n in 0..x.len() {
                    let an = a[n];
                    handler.increment_v(n, an * dt, x, v, theta, omega);
                    let vn = v[n];
                    handler.increment_x(n, vn * dt, x, v, theta, omega);

                    let alpha_n = alpha[n];
                    handler.increment_omega(n, alpha_n * dt, x, v, theta, omega);
                    let omega_n = omega[n];
                    handler.increment_theta(n, omega_n * dt, x, v, theta, omega);
                }

                self.t += dt;

                forces.accumulate_accels(self.t, x, v, theta, omega, a, alpha);
            }
        }
    }
}

/// Unary rotational aggregator: one evaluator call per particle.
pub struct RotationalUnaryForce<'h, H> {
    handler: &'h H,
}

impl<'h, H> RotationalUnaryForce<'h, H> {
    pub fn new(handler: &'h H) -> Self {
        Self { handler }
    }
}

impl<V: Field, H: RotationalUnaryAcceleration<V>> RotationalForcing<V>
    for RotationalUnaryForce<'_, H>
{
    fn accumulate_accels(
        &self,
        t: f64,
        x: &[V],
        v: &[V],
        theta: &[V],
        omega: &[V],
        a: &mut [V],
        alpha: &mut [V],
    ) {
        for (i, (ai, alphai)) in a.iter_mut().zip(alpha.iter_mut()).enumerate() {
            let (lin, ang) = self.handler.compute_acceleration(i, x, v, theta, omega, t);
            *ai = lin;
            *alphai = ang;
        }
    }
}

/// All-pairs rotational aggregator, serial or rayon-parallel. Writes are
/// partitioned by outer index across both acceleration buffers.
pub struct RotationalPairwiseForce<'h, H> {
    handler: &'h H,
    parallel: bool,
}

impl<'h, H> RotationalPairwiseForce<'h, H> {
    pub fn new(handler: &'h H) -> Self {
        Self {
            handler,
            parallel: true,
        }
    }

    pub fn serial(handler: &'h H) -> Self {
        Self {
            handler,
            parallel: false,
        }
    }
}

impl<H> RotationalPairwiseForce<'_, H> {
    fn accumulate_one<V: Field>(
        &self,
        i: usize,
        t: f64,
        x: &[V],
        v: &[V],
        theta: &[V],
        omega: &[V],
    ) -> (V, V)
    where
        H: RotationalBinaryAcceleration<V>,
    {
        let mut lin = V::zeros();
        let mut ang = V::zeros();
        for j in 0..x.len() {
            if i == j {
                continue;
            }
            let (dl, da) = self
                .handler
                .compute_acceleration(i, j, x, v, theta, omega, t);
            lin += dl;
            ang += da;
        }
        if let Some((el, ea)) = self.handler.compute_external(i, x, v, theta, omega, t) {
            lin += el;
            ang += ea;
        }
        (lin, ang)
    }
}

impl<V: Field, H: RotationalBinaryAcceleration<V>> RotationalForcing<V>
    for RotationalPairwiseForce<'_, H>
{
    fn accumulate_accels(
        &self,
        t: f64,
        x: &[V],
        v: &[V],
        theta: &[V],
        omega: &[V],
        a: &mut [V],
        alpha: &mut [V],
    ) {
        if self.parallel {
            a.par_iter_mut()
                .zip(alpha.par_iter_mut())
                .enumerate()
                .for_each(|(i, (ai, alphai))| {
                    let (lin, ang) = self.accumulate_one(i, t, x, v, theta, omega);
                    *ai = lin;
                    *alphai = ang;
                });
        } else {
            for (i, (ai, alphai)) in a.iter_mut().zip(alpha.iter_mut()).enumerate() {
                let (lin, ang) = self.accumulate_one(i, t, x, v, theta, omega);
                *ai = lin;
                *alphai = ang;
            }
        }
    }
}

/// Neighbor-list-scoped rotational aggregator.
pub struct RotationalNeighborForce<'h, H> {
    handler: &'h H,
    neighbors: NeighborList,
}

impl<'h, H> RotationalNeighborForce<'h, H> {
    pub fn new(handler: &'h H, n_part: usize, r_verlet: f64) -> Self {
        Self {
            handler,
            neighbors: NeighborList::new(n_part, r_verlet),
        }
    }

    pub fn neighbor_list(&self) -> &NeighborList {
        &self.neighbors
    }
}

impl<V: Field, H: RotationalBinaryAcceleration<V>> RotationalForcing<V>
    for RotationalNeighborForce<'_, H>
{
    fn accumulate_accels(
        &self,
        t: f64,
        x: &[V],
        v: &[V],
        theta: &[V],
        omega: &[V],
        a: &mut [V],
        alpha: &mut [V],
    ) {
        a.par_iter_mut()
            .zip(alpha.par_iter_mut())
            .enumerate()
            .for_each(|(i, (ai, alphai))| {
                let mut lin = V::zeros();
                let mut ang = V::zeros();
                for &j in self.neighbors.neighbors_of(i) {
                    if i == j {
                        continue;
                    }
                    let (dl, da) = self
                        .handler
                        .compute_acceleration(i, j, x, v, theta, omega, t);
                    lin += dl;
                    ang += da;
                }
                if let Some((el, ea)) = self.handler.compute_external(i, x, v, theta, omega, t) {
                    lin += el;
                    ang += ea;
                }
                *ai = lin;
                *alphai = ang;
            });
    }
}

impl<V: Field, H> NeighborScoped<V> for RotationalNeighborForce<'_, H> {
    fn rebuild_neighbors(&mut self, x: &[V]) {
        self.neighbors.rebuild(x);
    }
}

/// Second-order system with linear and rotational state.
pub struct RotationalSystem<'h, V: Field, F: RotationalForcing<V>, S: RotationalStepHandler<V>> {
    x: Vec<V>,
    v: Vec<V>,
    a: Vec<V>,
    theta: Vec<V>,
    omega: Vec<V>,
    alpha: Vec<V>,
    integrator: RotationalIntegrator,
    forces: F,
    handler: &'h S,
}

impl<'h, V, F, S> RotationalSystem<'h, V, F, S>
where
    V: Field,
    F: RotationalForcing<V>,
    S: RotationalStepHandler<V>,
{
    /// Build a rotational system from initial buffers. All four buffers must
    /// have equal length, fixed for the lifetime of the system.
    pub fn new(
        x0: Vec<V>,
        v0: Vec<V>,
        theta0: Vec<V>,
        omega0: Vec<V>,
        t0: f64,
        scheme: RotationalSchemeKind,
        forces: F,
        handler: &'h S,
    ) -> Result<Self> {
        if x0.len() != v0.len() || x0.len() != theta0.len() || x0.len() != omega0.len() {
            return Err(Error::SizeMismatch {
                context: "RotationalSystem::new",
                lengths: vec![x0.len(), v0.len(), theta0.len(), omega0.len()],
            });
        }

        let n = x0.len();
        let mut sys = Self {
            x: x0,
            v: v0,
            a: vec![V::zeros(); n],
            theta: theta0,
            omega: omega0,
            alpha: vec![V::zeros(); n],
            integrator: RotationalIntegrator::new(scheme, t0),
            forces,
            handler,
        };

        if sys.integrator.needs_initial_acceleration() {
            sys.forces.accumulate_accels(
                t0,
                &sys.x,
                &sys.v,
                &sys.theta,
                &sys.omega,
                &mut sys.a,
                &mut sys.alpha,
            );
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
            &mut self.theta,
            &mut self.omega,
            &mut self.alpha,
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

    pub fn get_theta(&self) -> &[V] {
        &self.theta
    }

    pub fn get_omega(&self) -> &[V] {
        &self.omega
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn time(&self) -> f64 {
        self.integrator.time()
    }
}

impl<V, F, S> RotationalSystem<'_, V, F, S>
where
    V: Field,
    F: RotationalForcing<V> + NeighborScoped<V>,
    S: RotationalStepHandler<V>,
{
    /// Rebuild the aggregator's neighbor lists from current positions.
    pub fn update_neighbor_list(&mut self) {
        self.forces.rebuild_neighbors(&self.x);
    }
}

//! Fixed-step integration schemes for second-order systems.
//!
//! An [`Integrator`] owns the simulation clock and the per-scheme state,
//! selected at construction from [`SchemeKind`]. Every scheme mutates the
//! state buffers in place through the step handler and re-fills the
//! acceleration buffer by invoking the force aggregator, never by deriving
//! accelerations itself.

use std::mem;

use super::forces::Forcing;
use super::states::Field;
use super::step_handler::StepHandler;

/// Integration scheme selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeKind {
    /// First order. One acceleration evaluation per step, at the pre-step
    /// state. Position update carries the half-acceleration Taylor term to
    /// reduce truncation error.
    ForwardEuler,
    /// Textbook symmetric Velocity Verlet. Two acceleration evaluations per
    /// step (before and after the position update) and a second acceleration
    /// buffer swapped between them.
    VelocityVerlet,
    /// Leapfrog-style Velocity Verlet: a one-time backward half-kick aligns
    /// the velocities, after which each step costs a single acceleration
    /// evaluation. Preferred when force evaluation is expensive.
    VelocityVerletHalf,
}

/// Per-scheme mutable state.
enum Scheme<V: Field> {
    ForwardEuler,
    VelocityVerlet { a_old: Vec<V> },
    VelocityVerletHalf { primed: bool },
}

/// Simulation clock plus the chosen scheme.
pub struct Integrator<V: Field> {
    t: f64,
    scheme: Scheme<V>,
}

impl<V: Field> Integrator<V> {
    pub fn new(kind: SchemeKind, t0: f64, n_part: usize) -> Self {
        let scheme = match kind {
            SchemeKind::ForwardEuler => Scheme::ForwardEuler,
            SchemeKind::VelocityVerlet => Scheme::VelocityVerlet {
                a_old: vec![V::zeros(); n_part],
            },
            SchemeKind::VelocityVerletHalf => Scheme::VelocityVerletHalf { primed: false },
        };
        Self { t: t0, scheme }
    }

    /// Current simulation time. Advances by `dt` on every step; not a wall
    /// clock.
    pub fn time(&self) -> f64 {
        self.t
    }

    /// Both Verlet forms start from an acceleration evaluated at the initial
    /// state; the system constructor performs that evaluation.
    pub(crate) fn needs_initial_acceleration(&self) -> bool {
        !matches!(self.scheme, Scheme::ForwardEuler)
    }

    /// Advance the state by one step of size `dt`.
    pub fn do_step<F, S>(
        &mut self,
        dt: f64,
        x: &mut [V],
        v: &mut [V],
        a: &mut Vec<V>,
        forces: &F,
        handler: &S,
    ) where
        F: Forcing<V>,
        S: StepHandler<V>,
    {
        match &mut self.scheme {
            Scheme::ForwardEuler => {
                // a_n from the pre-step state at t_n
                forces.accumulate_accels(self.t, x, v, a);
                self.t += dt;

                // x_n+1 = x_n + v_n dt + 1/2 a_n dt^2
                // v_n+1 = v_n + a_n dt
                for n in 0..x.len() {
                    let vn = v[n];
                    let an = a[n];
                    handler.increment_x(n, vn * dt + an * (0.5 * dt * dt), x, v);
                    handler.increment_v(n, an * dt, x, v);
                }
            }
            Scheme::VelocityVerlet { a_old } => {
                self.t += dt;

                // x_n+1 = x_n + v_n dt + 1/2 a_n dt^2
                for n in 0..x.len() {
                    let vn = v[n];
                    let an = a[n];
                    handler.increment_x(n, vn * dt + an * (0.5 * dt * dt), x, v);
                }

                // Retire a_n into the old buffer, then recompute a_n+1 at the
                // updated positions
                mem::swap(a, a_old);
                forces.accumulate_accels(self.t, x, v, a);

                // v_n+1 = v_n + 1/2 (a_n + a_n+1) dt
                for n in 0..x.len() {
                    let dv = (a_old[n] + a[n]) * (0.5 * dt);
                    handler.increment_v(n, dv, x, v);
                }
            }
            Scheme::VelocityVerletHalf { primed } => {
                // One-time backward Euler half step in velocity, using the
                // acceleration evaluated at construction
                if !*primed {
                    *primed = true;
                    for n in 0..x.len() {
                        let an = a[n];
                        handler.increment_v(n, an * (-0.5 * dt), x, v);
                    }
                    forces.accumulate_accels(self.t, x, v, a);
                }

                // v_n+1/2 = v_n-1/2 + a_n dt, then x_n+1 = x_n + v_n+1/2 dt
                for n in 0..x.len() {
                    let an = a[n];
                    handler.increment_v(n, an * dt, x, v);
                    let vn = v[n];
                    handler.increment_x(n, vn * dt, x, v);
                }

                self.t += dt;

                // a_n+1 for the next step
                forces.accumulate_accels(self.t, x, v, a);
            }
        }
    }
}

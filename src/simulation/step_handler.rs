//! Step handlers commit computed increments into the state buffers.
//!
//! Integration schemes never write to `x` or `v` directly; every increment
//! goes through a handler so that callers can substitute their own (for
//! example to record displacement alongside the state, or to enforce bounds)
//! without touching the integrator. The defaults perform plain addition.

use super::states::Field;

/// Commits position and velocity increments for one particle at a time.
///
/// Each call mutates exactly one slot of exactly one buffer. The non-mutated
/// buffer is passed read-only so custom handlers can derive quantities from
/// the full state.
pub trait StepHandler<V: Field>: Send + Sync {
    /// Add `dx` to `x[n]`.
    fn increment_x(&self, n: usize, dx: V, x: &mut [V], v: &[V]);

    /// Add `dv` to `v[n]`.
    fn increment_v(&self, n: usize, dv: V, x: &[V], v: &mut [V]);
}

/// Default handler: plain `+=` into the target slot.
pub struct AdditiveStepHandler;

impl<V: Field> StepHandler<V> for AdditiveStepHandler {
    fn increment_x(&self, n: usize, dx: V, x: &mut [V], _v: &[V]) {
        x[n] += dx;
    }

    fn increment_v(&self, n: usize, dv: V, _x: &[V], v: &mut [V]) {
        v[n] += dv;
    }
}

/// Step handler for rotational systems: commits increments to the linear
/// pair `(x, v)` and the angular pair `(theta, omega)`.
pub trait RotationalStepHandler<V: Field>: Send + Sync {
    /// Add `dx` to `x[n]`.
    fn increment_x(&self, n: usize, dx: V, x: &mut [V], v: &[V], theta: &[V], omega: &[V]);

    /// Add `dv` to `v[n]`.
    fn increment_v(&self, n: usize, dv: V, x: &[V], v: &mut [V], theta: &[V], omega: &[V]);

    /// Add `dtheta` to `theta[n]`.
    fn increment_theta(&self, n: usize, dtheta: V, x: &[V], v: &[V], theta: &mut [V], omega: &[V]);

    /// Add `domega` to `omega[n]`.
    fn increment_omega(&self, n: usize, domega: V, x: &[V], v: &[V], theta: &[V], omega: &mut [V]);
}

/// Default rotational handler: plain `+=` into the target slot.
pub struct AdditiveRotationalStepHandler;

impl<V: Field> RotationalStepHandler<V> for AdditiveRotationalStepHandler {
    fn increment_x(&self, n: usize, dx: V, x: &mut [V], _v: &[V], _theta: &[V], _omega: &[V]) {
        x[n] += dx;
    }

    fn increment_v(&self, n: usize, dv: V, _x: &[V], v: &mut [V], _theta: &[V], _omega: &[V]) {
        v[n] += dv;
    }

    fn increment_theta(&self, n: usize, dtheta: V, _x: &[V], _v: &[V], theta: &mut [V], _omega: &[V]) {
        theta[n] += dtheta;
    }

    fn increment_omega(&self, n: usize, domega: V, _x: &[V], _v: &[V], _theta: &[V], omega: &mut [V]) {
        omega[n] += domega;
    }
}

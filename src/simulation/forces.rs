//! Acceleration evaluator contracts and force aggregators.
//!
//! A physics model supplies an evaluator (per-particle or per-pair); an
//! aggregator turns it into a filled acceleration buffer once per evaluation,
//! following a fixed "reset, then accumulate" protocol. Pairwise aggregation
//! is where all the cost lives, so the binary aggregators come in serial,
//! parallel, and neighbor-list-scoped flavors.
//!
//! Parallel discipline: workers read the previous state buffers concurrently
//! and each worker writes only `a[i]` for its own outer index `i`. Writes
//! are partitioned by outer index, so no locks or atomics are involved.
//! Floating-point summation order across threads is unspecified, so runs at
//! different thread counts agree only to numerical tolerance.

use rayon::prelude::*;

use super::neighbors::NeighborList;
use super::states::Field;

/// Per-particle acceleration law: no cross-particle coupling.
pub trait UnaryAcceleration<V: Field>: Send + Sync {
    /// Acceleration of particle `i` given the full state at time `t`.
    fn compute_acceleration(&self, i: usize, x: &[V], v: &[V], t: f64) -> V;
}

/// Per-pair acceleration law.
///
/// `compute_acceleration(i, j, ..)` returns the contribution to particle `i`
/// from its interaction with `j`. No symmetry is assumed: the aggregator
/// queries `(j, i)` separately for the reciprocal contribution.
pub trait BinaryAcceleration<V: Field>: Send + Sync {
    fn compute_acceleration(&self, i: usize, j: usize, x: &[V], v: &[V], t: f64) -> V;

    /// Optional per-particle external term (gravity well, drag, ...) added
    /// once per particle on top of the pairwise sum. Defaults to none.
    fn compute_external(&self, _i: usize, _x: &[V], _v: &[V], _t: f64) -> Option<V> {
        None
    }
}

/// One complete acceleration evaluation: reset `a`, then accumulate every
/// relevant contribution. Invoked by the integrator, scheme-dependently,
/// one or two times per step.
pub trait Forcing<V: Field> {
    fn accumulate_accels(&self, t: f64, x: &[V], v: &[V], a: &mut [V]);
}

/// Aggregators that maintain a Verlet neighbor list and expose its rebuild.
pub trait NeighborScoped<V: Field> {
    fn rebuild_neighbors(&mut self, x: &[V]);
}

/// Unary aggregator: one evaluator call per particle, order-independent.
pub struct UnaryForce<'h, H> {
    handler: &'h H,
}

impl<'h, H> UnaryForce<'h, H> {
    pub fn new(handler: &'h H) -> Self {
        Self { handler }
    }
}

impl<V: Field, H: UnaryAcceleration<V>> Forcing<V> for UnaryForce<'_, H> {
    fn accumulate_accels(&self, t: f64, x: &[V], v: &[V], a: &mut [V]) {
        for (i, ai) in a.iter_mut().enumerate() {
            *ai = self.handler.compute_acceleration(i, x, v, t);
        }
    }
}

/// Binary all-pairs aggregator: O(N^2) per evaluation.
///
/// The parallel variant distributes the outer index over the rayon pool;
/// `accumulate_accels` returns only after every particle's contributions are
/// fully accumulated.
pub struct PairwiseForce<'h, H> {
    handler: &'h H,
    parallel: bool,
}

impl<'h, H> PairwiseForce<'h, H> {
    /// Rayon-parallel all-pairs aggregation.
    pub fn new(handler: &'h H) -> Self {
        Self {
            handler,
            parallel: true,
        }
    }

    /// Single-threaded all-pairs aggregation.
    pub fn serial(handler: &'h H) -> Self {
        Self {
            handler,
            parallel: false,
        }
    }
}

impl<H> PairwiseForce<'_, H> {
    fn accumulate_one<V: Field>(&self, i: usize, t: f64, x: &[V], v: &[V]) -> V
    where
        H: BinaryAcceleration<V>,
    {
        let mut acc = V::zeros();
        for j in 0..x.len() {
            if i == j {
                continue;
            }
            acc += self.handler.compute_acceleration(i, j, x, v, t);
        }
        if let Some(ext) = self.handler.compute_external(i, x, v, t) {
            acc += ext;
        }
        acc
    }
}

impl<V: Field, H: BinaryAcceleration<V>> Forcing<V> for PairwiseForce<'_, H> {
    fn accumulate_accels(&self, t: f64, x: &[V], v: &[V], a: &mut [V]) {
        if self.parallel {
            a.par_iter_mut()
                .enumerate()
                .for_each(|(i, ai)| *ai = self.accumulate_one(i, t, x, v));
        } else {
            for (i, ai) in a.iter_mut().enumerate() {
                *ai = self.accumulate_one(i, t, x, v);
            }
        }
    }
}

/// Binary aggregator scoped to a Verlet neighbor list: O(N * k) per
/// evaluation, where k is the typical neighbor count.
///
/// Matches all-pairs aggregation exactly when the list still covers every
/// pair within the physical interaction range; keeping the cutoff large
/// enough and rebuilding often enough is the driver's responsibility, and no
/// staleness check is performed here.
pub struct NeighborForce<'h, H> {
    handler: &'h H,
    neighbors: NeighborList,
}

impl<'h, H> NeighborForce<'h, H> {
    /// `n_part` particles, cutoff radius `r_verlet`. The list starts empty;
    /// the driver must rebuild it before the first evaluation.
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

impl<V: Field, H: BinaryAcceleration<V>> Forcing<V> for NeighborForce<'_, H> {
    fn accumulate_accels(&self, t: f64, x: &[V], v: &[V], a: &mut [V]) {
        a.par_iter_mut().enumerate().for_each(|(i, ai)| {
            let mut acc = V::zeros();
            for &j in self.neighbors.neighbors_of(i) {
                if i == j {
                    continue;
                }
                acc += self.handler.compute_acceleration(i, j, x, v, t);
            }
            if let Some(ext) = self.handler.compute_external(i, x, v, t) {
                acc += ext;
            }
            *ai = acc;
        });
    }
}

impl<V: Field, H> NeighborScoped<V> for NeighborForce<'_, H> {
    fn rebuild_neighbors(&mut self, x: &[V]) {
        self.neighbors.rebuild(x);
    }
}

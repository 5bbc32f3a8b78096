//! Verlet neighbor list.
//!
//! Per particle, the set of other particles that were within the cutoff
//! radius at the last rebuild. The rebuild is a full O(N^2) distance scan,
//! run far less often than force evaluation; between rebuilds the list is
//! deliberately allowed to go stale. Rebuild cadence is a driver decision:
//! too short wastes time re-scanning, too long silently misses particles
//! that drifted inside the cutoff.

use rayon::prelude::*;

use super::states::Field;

pub struct NeighborList {
    r_verlet: f64,
    neighbors: Vec<Vec<usize>>,
}

impl NeighborList {
    /// Empty lists for `n_part` particles with cutoff `r_verlet`.
    pub fn new(n_part: usize, r_verlet: f64) -> Self {
        Self {
            r_verlet,
            neighbors: vec![Vec::new(); n_part],
        }
    }

    /// Re-scan all pairs and record `j` as a neighbor of `i` whenever
    /// `|x[i] - x[j]| < r_verlet`. Parallel over `i`; each worker owns one
    /// particle's list.
    pub fn rebuild<V: Field>(&mut self, x: &[V]) {
        let r_verlet = self.r_verlet;
        self.neighbors.par_iter_mut().enumerate().for_each(|(i, list)| {
            list.clear();
            for j in 0..x.len() {
                if i == j {
                    continue;
                }
                if (x[i] - x[j]).norm() < r_verlet {
                    list.push(j);
                }
            }
        });
    }

    /// Neighbors of particle `i` as of the last rebuild.
    pub fn neighbors_of(&self, i: usize) -> &[usize] {
        &self.neighbors[i]
    }

    pub fn r_verlet(&self) -> f64 {
        self.r_verlet
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::states::NVec3;

    #[test]
    fn rebuild_respects_cutoff() {
        let x = vec![
            NVec3::new(0.0, 0.0, 0.0),
            NVec3::new(0.5, 0.0, 0.0),
            NVec3::new(3.0, 0.0, 0.0),
        ];
        let mut list = NeighborList::new(3, 1.0);
        list.rebuild(&x);

        assert_eq!(list.neighbors_of(0), &[1]);
        assert_eq!(list.neighbors_of(1), &[0]);
        assert!(list.neighbors_of(2).is_empty());
    }

    #[test]
    fn lists_start_empty() {
        let list = NeighborList::new(4, 1.0);
        for i in 0..4 {
            assert!(list.neighbors_of(i).is_empty());
        }
    }
}

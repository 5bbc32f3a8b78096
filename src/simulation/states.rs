//! Field value contract and concrete vector aliases.
//!
//! The engine is generic over the quantity stored in the state buffers:
//! anything with vector-space arithmetic and a norm qualifies. `f64` covers
//! one-dimensional systems, `NVec2`/`NVec3` cover planar and spatial ones.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use nalgebra::{Vector2, Vector3};

pub type NVec2 = Vector2<f64>;
pub type NVec3 = Vector3<f64>;

/// Arithmetic contract for the position/velocity/acceleration value type.
///
/// `Send + Sync` is required because force aggregation reads the state
/// buffers from rayon worker threads. The norm is only used by the
/// neighbor-list distance scan.
pub trait Field:
    Copy
    + Send
    + Sync
    + Add<Output = Self>
    + AddAssign
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Mul<f64, Output = Self>
{
    /// Additive identity, used to reset accumulation buffers.
    fn zeros() -> Self;

    /// Euclidean norm, used for cutoff-distance checks.
    fn norm(&self) -> f64;
}

impl Field for f64 {
    fn zeros() -> Self {
        0.0
    }

    fn norm(&self) -> f64 {
        self.abs()
    }
}

impl Field for NVec2 {
    fn zeros() -> Self {
        Vector2::zeros()
    }

    fn norm(&self) -> f64 {
        Vector2::norm(self)
    }
}

impl Field for NVec3 {
    fn zeros() -> Self {
        Vector3::zeros()
    }

    fn norm(&self) -> f64 {
        Vector3::norm(self)
    }
}

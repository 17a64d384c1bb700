//! Conversion between clinical (magnitude, axis) astigmatism and power vectors.
//!
//! A power vector `(J0, J45)` places a cylinder at twice its clinical axis, so
//! the 180° periodicity of an axis becomes a full turn. In this space ordinary
//! vector addition, subtraction and Euclidean norm are meaningful.
//!
//! Sign convention: a magnitude `>= 0` always denotes flattening along the
//! given axis. Both directions of the codec apply [`FLATTENING_SIGN`], so
//! [`to_polar`] is the exact inverse of [`to_vector`] for non-negative
//! magnitudes.

use std::ops::{Add, Neg, Sub};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::measurement::{normalize_axis, AstigmatismMeasurement};

/// Sign applied to both power-vector components of a flattening magnitude.
pub const FLATTENING_SIGN: f64 = -1.0;

/// Orthogonal double-angle representation of a cylinder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerVector {
    pub j0: f64,
    pub j45: f64,
}

impl PowerVector {
    pub const ZERO: Self = Self { j0: 0.0, j45: 0.0 };

    #[inline]
    pub const fn new(j0: f64, j45: f64) -> Self {
        Self { j0, j45 }
    }

    /// Euclidean norm.
    #[inline]
    pub fn norm(self) -> f64 {
        DVec2::from(self).length()
    }
}

impl From<DVec2> for PowerVector {
    #[inline]
    fn from(v: DVec2) -> Self {
        Self { j0: v.x, j45: v.y }
    }
}

impl From<PowerVector> for DVec2 {
    #[inline]
    fn from(v: PowerVector) -> Self {
        DVec2::new(v.j0, v.j45)
    }
}

impl Add for PowerVector {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        (DVec2::from(self) + DVec2::from(rhs)).into()
    }
}

impl Sub for PowerVector {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        (DVec2::from(self) - DVec2::from(rhs)).into()
    }
}

impl Neg for PowerVector {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        (-DVec2::from(self)).into()
    }
}

/// Converts a cylinder to its power vector. `‖result‖ == |magnitude|`.
pub fn to_vector(magnitude: f64, axis_deg: f64) -> PowerVector {
    let theta = (2.0 * normalize_axis(axis_deg)).to_radians();
    let (sin, cos) = theta.sin_cos();
    PowerVector {
        j0: FLATTENING_SIGN * magnitude * cos,
        j45: FLATTENING_SIGN * magnitude * sin,
    }
}

/// Converts a power vector back to (magnitude, axis).
///
/// The zero vector maps to axis 0, which carries no meaning.
pub fn to_polar(vector: PowerVector) -> AstigmatismMeasurement {
    let magnitude = vector.norm();
    if magnitude == 0.0 {
        return AstigmatismMeasurement::ZERO;
    }

    let double_angle = (FLATTENING_SIGN * vector.j45).atan2(FLATTENING_SIGN * vector.j0);
    AstigmatismMeasurement::new(magnitude, 0.5 * double_angle.to_degrees())
}

impl From<AstigmatismMeasurement> for PowerVector {
    #[inline]
    fn from(m: AstigmatismMeasurement) -> Self {
        to_vector(m.magnitude, m.axis)
    }
}

impl From<PowerVector> for AstigmatismMeasurement {
    #[inline]
    fn from(v: PowerVector) -> Self {
        to_polar(v)
    }
}

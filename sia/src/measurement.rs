//! Clinical astigmatism values in (magnitude, axis) form.

use serde::{Deserialize, Serialize};

use crate::laterality::Eye;
use crate::scan::{self, ScanReport};
use crate::vector_error;

/// Period of an astigmatism axis in degrees. Axes are undirected lines.
pub const AXIS_PERIOD_DEG: f64 = 180.0;

/// Reduces any axis to the canonical range `[0, 180)`.
#[inline]
pub fn normalize_axis(axis_deg: f64) -> f64 {
    let axis = axis_deg.rem_euclid(AXIS_PERIOD_DEG);
    // rem_euclid can round up to the period for tiny negative inputs.
    if axis >= AXIS_PERIOD_DEG {
        0.0
    } else {
        axis
    }
}

/// A cylindrical correction: magnitude in diopters, axis in degrees.
///
/// The axis is normalized into `[0, 180)` on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AstigmatismMeasurement {
    pub magnitude: f64,
    pub axis: f64,
}

impl AstigmatismMeasurement {
    pub fn new(magnitude: f64, axis_deg: f64) -> Self {
        Self {
            magnitude,
            axis: normalize_axis(axis_deg),
        }
    }

    /// No correction. The axis is irrelevant.
    pub const ZERO: Self = Self {
        magnitude: 0.0,
        axis: 0.0,
    };
}

/// Vectorial error between two corrections, in astigmatism form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorResult {
    /// Distance in power-vector space, always `>= 0`.
    pub magnitude: f64,
    /// Orientation of the residual, `[0, 180)`. Meaningless when `magnitude == 0`.
    pub axis: f64,
}

impl ErrorResult {
    pub fn is_zero(&self) -> bool {
        self.magnitude == 0.0
    }

    /// The error axis, or `None` when there is no residual to orient.
    pub fn oriented_axis(&self) -> Option<f64> {
        (!self.is_zero()).then_some(self.axis)
    }
}

/// One clinical case: an incision, the measured SIA and the assumption to compare against.
///
/// All axes are given as measured on `eye`; evaluation mirrors left-eye
/// axes into right-eye orientation first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaseInput {
    #[serde(default)]
    pub eye: Eye,
    pub incision_axis: f64,
    /// Axis of the assumed SIA. Falls back to `incision_axis` when absent.
    #[serde(default)]
    pub expected_axis: Option<f64>,
    pub actual: AstigmatismMeasurement,
    pub assumed_magnitude: f64,
}

impl CaseInput {
    pub fn new(incision_axis: f64, actual: AstigmatismMeasurement, assumed_magnitude: f64) -> Self {
        Self {
            eye: Eye::Right,
            incision_axis,
            expected_axis: None,
            actual,
            assumed_magnitude,
        }
    }

    pub fn with_eye(mut self, eye: Eye) -> Self {
        self.eye = eye;
        self
    }

    pub fn with_expected_axis(mut self, expected_axis: f64) -> Self {
        self.expected_axis = Some(expected_axis);
        self
    }

    /// Axis shared by every assumed SIA of this case, in right-eye orientation.
    pub fn reference_axis(&self) -> f64 {
        self.eye
            .orient(self.expected_axis.unwrap_or(self.incision_axis))
    }

    /// The measured SIA in right-eye orientation.
    pub fn oriented_actual(&self) -> AstigmatismMeasurement {
        AstigmatismMeasurement::new(self.actual.magnitude, self.eye.orient(self.actual.axis))
    }

    /// The assumed SIA in right-eye orientation.
    pub fn assumed(&self) -> AstigmatismMeasurement {
        AstigmatismMeasurement::new(self.assumed_magnitude, self.reference_axis())
    }

    /// Vectorial error between the measured and the assumed SIA.
    pub fn evaluate(&self) -> ErrorResult {
        vector_error::error_of(self.oriented_actual(), self.assumed())
    }

    /// Scans `candidates` as assumed magnitudes along the reference axis.
    pub fn scan(&self, candidates: &[f64], decimals: u32) -> crate::Result<ScanReport> {
        let table = scan::scan_with_decimals(
            self.oriented_actual(),
            self.reference_axis(),
            candidates,
            decimals,
        );
        ScanReport::from_table(table)
    }
}

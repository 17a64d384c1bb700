//! Vectorial difference between two astigmatism measurements.

use crate::measurement::{AstigmatismMeasurement, ErrorResult};
use crate::power_vector::{self, PowerVector};

/// `actual - assumed` in power-vector space. Defined for every input,
/// including zero magnitudes.
#[inline]
pub fn difference(actual: AstigmatismMeasurement, assumed: AstigmatismMeasurement) -> PowerVector {
    PowerVector::from(actual) - PowerVector::from(assumed)
}

/// Vectorial error of `assumed` with respect to `actual`.
pub fn error_of(actual: AstigmatismMeasurement, assumed: AstigmatismMeasurement) -> ErrorResult {
    let residual = power_vector::to_polar(difference(actual, assumed));
    ErrorResult {
        magnitude: residual.magnitude,
        axis: residual.axis,
    }
}

/// Error between an achieved and a planned residual cylinder (toric planning check).
///
/// Cylinders may be given with either sign; both are converted with the same
/// convention so the difference is consistent.
pub fn residual_error(
    achieved: AstigmatismMeasurement,
    planned: AstigmatismMeasurement,
) -> ErrorResult {
    error_of(achieved, planned)
}

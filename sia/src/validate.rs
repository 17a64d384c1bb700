//! Domain checks for values entering the calculator from outside.
//!
//! The codec and engine accept any finite numbers; these checks belong to
//! the callers that read forms, command lines or files.

use crate::error::{Error, Result};
use crate::measurement::CaseInput;

pub const MAX_AXIS_DEG: f64 = 180.0;

pub fn validate_axis(field: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::Domain {
            field,
            value,
            reason: "axis must be a finite number",
        });
    }
    if !(0.0..=MAX_AXIS_DEG).contains(&value) {
        return Err(Error::Domain {
            field,
            value,
            reason: "axis must be within [0, 180] degrees",
        });
    }
    Ok(value)
}

pub fn validate_magnitude(field: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::Domain {
            field,
            value,
            reason: "magnitude must be a finite number",
        });
    }
    if value < 0.0 {
        return Err(Error::Domain {
            field,
            value,
            reason: "flattening magnitude must be >= 0",
        });
    }
    Ok(value)
}

/// Refraction cylinder; either sign convention is accepted.
pub fn validate_cylinder(field: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::Domain {
            field,
            value,
            reason: "cylinder must be a finite number",
        });
    }
    Ok(value)
}

pub fn validate_candidates(candidates: &[f64]) -> Result<()> {
    if candidates.is_empty() {
        return Err(Error::EmptyCandidateSet);
    }
    for &candidate in candidates {
        validate_magnitude("candidate", candidate)?;
    }
    Ok(())
}

pub fn validate_case(case: &CaseInput) -> Result<()> {
    validate_axis("incision_axis", case.incision_axis)?;
    if let Some(expected_axis) = case.expected_axis {
        validate_axis("expected_axis", expected_axis)?;
    }
    validate_axis("actual_axis", case.actual.axis)?;
    validate_magnitude("actual_magnitude", case.actual.magnitude)?;
    validate_magnitude("assumed_magnitude", case.assumed_magnitude)?;
    Ok(())
}

//! Candidate sweep argument in `start:stop:step` form.

use std::fmt;
use std::str::FromStr;

/// Sweep values are rounded to this many decimals to absorb step accumulation.
const SWEEP_DECIMALS: u32 = 10;

/// Upper bound on the number of values a sweep may expand to.
pub const MAX_SWEEP_VALUES: usize = 100_000;

/// Inclusive ascending sweep, e.g. `0:0.5:0.1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeArg {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl FromStr for RangeArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err("Range must be in format 'start:stop:step'".to_string());
        }

        let parse = |part: &str, name: &str| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| format!("Invalid {name} value: {part:?}"))
        };
        let start = parse(parts[0], "start")?;
        let stop = parse(parts[1], "stop")?;
        let step = parse(parts[2], "step")?;

        for (name, value) in [("start", start), ("stop", stop), ("step", step)] {
            if !value.is_finite() {
                return Err(format!("{name} must be finite, got {value}"));
            }
        }
        if step <= 0.0 {
            return Err("Step must be positive".to_string());
        }
        if start > stop {
            return Err(format!("Start ({start}) must not exceed stop ({stop})"));
        }

        let range = RangeArg { start, stop, step };
        let count = range.count();
        if count > MAX_SWEEP_VALUES as f64 {
            return Err(format!(
                "Range expands to {count} values, at most {MAX_SWEEP_VALUES} allowed"
            ));
        }

        Ok(range)
    }
}

impl fmt::Display for RangeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.start, self.stop, self.step)
    }
}

impl RangeArg {
    /// Number of sweep values, as a float so oversized ranges can be rejected.
    fn count(&self) -> f64 {
        ((self.stop - self.start) / self.step + 1e-9).floor() + 1.0
    }

    /// All values from start to stop (inclusive, with tolerance) by step.
    /// Expansion stops at [`MAX_SWEEP_VALUES`].
    pub fn to_vec(&self) -> Vec<f64> {
        let count = self.count();
        let count = if count >= 1.0 {
            (count as usize).min(MAX_SWEEP_VALUES)
        } else {
            0
        };
        (0..count)
            .map(|i| sia::scan::round_to(self.start + i as f64 * self.step, SWEEP_DECIMALS))
            .collect()
    }
}

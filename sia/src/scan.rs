//! Scanning hypothetical assumed-SIA magnitudes along a fixed axis.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::measurement::AstigmatismMeasurement;
use crate::vector_error;

/// Assumed-SIA magnitudes scanned when the caller supplies none.
pub const DEFAULT_CANDIDATES: [f64; 6] = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5];

/// Decimal places kept for stored error magnitudes. Tie-breaking operates
/// on the rounded values.
pub const ERROR_DECIMALS: u32 = 4;

/// Rounds half away from zero to `decimals` places.
///
/// The value is scaled in binary floating point before rounding, so an input
/// whose decimal expansion sits just below a half may still round up once
/// scaled. Exact halves such as `0.25` at one place go up to `0.3`, not to
/// the even neighbour. Candidates that differ only in such a last digit can
/// therefore tie or separate differently than a decimal-exact rounding would.
#[inline]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// One scanned assumption and its vectorial error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub assumed_magnitude: f64,
    pub error: f64,
}

/// Candidates in scan order. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateTable(Vec<Candidate>);

impl CandidateTable {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self(candidates)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.0.get(index)
    }
}

impl<'a> IntoIterator for &'a CandidateTable {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Candidate> for CandidateTable {
    fn from_iter<I: IntoIterator<Item = Candidate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Evaluates each candidate magnitude at `fixed_axis` against `actual`,
/// keeping errors rounded to [`ERROR_DECIMALS`].
pub fn scan(actual: AstigmatismMeasurement, fixed_axis: f64, candidates: &[f64]) -> CandidateTable {
    scan_with_decimals(actual, fixed_axis, candidates, ERROR_DECIMALS)
}

/// [`scan`] over [`DEFAULT_CANDIDATES`].
pub fn scan_default(actual: AstigmatismMeasurement, fixed_axis: f64) -> CandidateTable {
    scan(actual, fixed_axis, &DEFAULT_CANDIDATES)
}

pub fn scan_with_decimals(
    actual: AstigmatismMeasurement,
    fixed_axis: f64,
    candidates: &[f64],
    decimals: u32,
) -> CandidateTable {
    candidates
        .iter()
        .map(|&assumed_magnitude| {
            let assumed = AstigmatismMeasurement::new(assumed_magnitude, fixed_axis);
            let error = vector_error::error_of(actual, assumed).magnitude;
            Candidate {
                assumed_magnitude,
                error: round_to(error, decimals),
            }
        })
        .collect()
}

/// A candidate together with its position in the table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub index: usize,
    pub candidate: Candidate,
}

/// Least and most erroneous candidates of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extremes {
    pub best: Pick,
    pub worst: Pick,
}

/// Finds the minimum- and maximum-error candidates. The first occurrence wins ties.
pub fn best_and_worst(table: &CandidateTable) -> Result<Extremes> {
    let mut iter = table.iter().copied().enumerate();
    let (index, first) = iter.next().ok_or(Error::EmptyCandidateSet)?;

    let first = Pick {
        index,
        candidate: first,
    };
    let (best, worst) = iter.fold((first, first), |(best, worst), (index, candidate)| {
        let pick = Pick { index, candidate };
        let best = if candidate.error < best.candidate.error {
            pick
        } else {
            best
        };
        let worst = if candidate.error > worst.candidate.error {
            pick
        } else {
            worst
        };
        (best, worst)
    });

    Ok(Extremes { best, worst })
}

/// A scan table with its extremes already ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub table: CandidateTable,
    pub extremes: Extremes,
}

impl ScanReport {
    pub fn from_table(table: CandidateTable) -> Result<Self> {
        let extremes = best_and_worst(&table)?;
        Ok(Self { table, extremes })
    }

    pub fn best(&self) -> Candidate {
        self.extremes.best.candidate
    }

    pub fn worst(&self) -> Candidate {
        self.extremes.worst.candidate
    }
}

//! Row-wise evaluation of many independent cases.
//!
//! Rows arrive loosely typed, as read from a case file. Each row is parsed
//! and evaluated on its own; a malformed row yields a [`RowError`] in its
//! slot and the remaining rows are still evaluated. Output order always
//! matches input order.

use common::parallel::{self, CancelToken};
use serde::{Deserialize, Serialize};

use crate::config::CalculatorConfig;
use crate::error::{Result, RowError, RowFault};
use crate::laterality::Eye;
use crate::measurement::{AstigmatismMeasurement, CaseInput};
use crate::scan::{round_to, ScanReport};
use crate::validate;

#[cfg(test)]
mod tests;

/// A single cell as found in a case file.
///
/// Any value that is neither a number nor text lands in `Other`, so a stray
/// boolean or list fails only its own row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

impl Cell {
    /// Numeric value of the cell. Blank text counts as absent.
    fn number(&self, field: &'static str) -> std::result::Result<Option<f64>, RowFault> {
        match self {
            Cell::Number(value) => Ok(Some(*value)),
            Cell::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                text.parse::<f64>()
                    .map(Some)
                    .map_err(|_| RowFault::NotNumeric {
                        field,
                        text: text.to_string(),
                    })
            }
            Cell::Other(value) => Err(RowFault::NotNumeric {
                field,
                text: value.to_string(),
            }),
        }
    }
}

/// One case as read from a file. Column names of the spreadsheet template
/// are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRow {
    #[serde(alias = "Incision Axis")]
    pub incision_axis: Option<Cell>,
    #[serde(alias = "Actual SIA Magnitude")]
    pub actual_magnitude: Option<Cell>,
    #[serde(alias = "Actual SIA Axis")]
    pub actual_axis: Option<Cell>,
    #[serde(alias = "Expected SIA Axis")]
    pub expected_axis: Option<Cell>,
    #[serde(alias = "Assumed SIA Magnitude")]
    pub assumed_magnitude: Option<Cell>,
    #[serde(alias = "Eye")]
    pub eye: Option<Cell>,
}

fn optional_number(
    cell: &Option<Cell>,
    field: &'static str,
) -> std::result::Result<Option<f64>, RowFault> {
    match cell {
        Some(cell) => cell.number(field),
        None => Ok(None),
    }
}

fn required_number(cell: &Option<Cell>, field: &'static str) -> std::result::Result<f64, RowFault> {
    optional_number(cell, field)?.ok_or(RowFault::Missing { field })
}

fn parse_eye(cell: &Option<Cell>) -> std::result::Result<Eye, RowFault> {
    match cell {
        None => Ok(Eye::default()),
        Some(Cell::Text(text)) if text.trim().is_empty() => Ok(Eye::default()),
        Some(Cell::Text(text)) => text
            .trim()
            .parse::<Eye>()
            .map_err(|_| RowFault::Unrecognized {
                field: "eye",
                text: text.clone(),
            }),
        Some(Cell::Number(value)) => Err(RowFault::Unrecognized {
            field: "eye",
            text: value.to_string(),
        }),
        Some(Cell::Other(value)) => Err(RowFault::Unrecognized {
            field: "eye",
            text: value.to_string(),
        }),
    }
}

impl RawRow {
    /// A fully numeric row without optional columns.
    pub fn numeric(incision_axis: f64, actual_magnitude: f64, actual_axis: f64) -> Self {
        Self {
            incision_axis: Some(incision_axis.into()),
            actual_magnitude: Some(actual_magnitude.into()),
            actual_axis: Some(actual_axis.into()),
            ..Default::default()
        }
    }

    pub fn with_assumed_magnitude(mut self, assumed_magnitude: impl Into<Cell>) -> Self {
        self.assumed_magnitude = Some(assumed_magnitude.into());
        self
    }

    pub fn with_expected_axis(mut self, expected_axis: impl Into<Cell>) -> Self {
        self.expected_axis = Some(expected_axis.into());
        self
    }

    pub fn with_eye(mut self, eye: impl Into<Cell>) -> Self {
        self.eye = Some(eye.into());
        self
    }

    /// Parses and validates the row. A missing assumed magnitude becomes
    /// `default_assumed_magnitude`.
    pub fn parse(
        &self,
        index: usize,
        default_assumed_magnitude: f64,
    ) -> std::result::Result<CaseInput, RowError> {
        self.parse_fields(default_assumed_magnitude)
            .map_err(|fault| fault.at(index))
    }

    fn parse_fields(&self, default_assumed_magnitude: f64) -> std::result::Result<CaseInput, RowFault> {
        let incision_axis = required_number(&self.incision_axis, "incision_axis")?;
        let actual_magnitude = required_number(&self.actual_magnitude, "actual_magnitude")?;
        let actual_axis = required_number(&self.actual_axis, "actual_axis")?;
        let expected_axis = optional_number(&self.expected_axis, "expected_axis")?;
        let assumed_magnitude = optional_number(&self.assumed_magnitude, "assumed_magnitude")?
            .unwrap_or(default_assumed_magnitude);
        let eye = parse_eye(&self.eye)?;

        validate::validate_axis("incision_axis", incision_axis)?;
        validate::validate_magnitude("actual_magnitude", actual_magnitude)?;
        validate::validate_axis("actual_axis", actual_axis)?;
        if let Some(expected_axis) = expected_axis {
            validate::validate_axis("expected_axis", expected_axis)?;
        }
        validate::validate_magnitude("assumed_magnitude", assumed_magnitude)?;

        Ok(CaseInput {
            eye,
            incision_axis,
            expected_axis,
            actual: AstigmatismMeasurement::new(actual_magnitude, actual_axis),
            assumed_magnitude,
        })
    }
}

/// Contents of a batch case file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchFile {
    /// Overrides the configured candidates for this batch.
    #[serde(default)]
    pub candidates: Option<Vec<f64>>,
    pub rows: Vec<RawRow>,
}

pub type RowOutcome<T> = std::result::Result<T, RowError>;

/// Per-row results in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome<T> {
    /// One entry per evaluated row. Shorter than the input only when cancelled.
    pub rows: Vec<RowOutcome<T>>,
    pub cancelled: bool,
}

impl<T> BatchOutcome<T> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn successes(&self) -> impl Iterator<Item = (usize, &T)> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(index, row)| row.as_ref().ok().map(|value| (index, value)))
    }

    pub fn failures(&self) -> impl Iterator<Item = &RowError> {
        self.rows.iter().filter_map(|row| row.as_ref().err())
    }
}

/// Evaluates batches of rows with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct BatchEvaluator {
    config: CalculatorConfig,
    cancel: Option<CancelToken>,
}

impl BatchEvaluator {
    pub fn new(config: CalculatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: None,
        })
    }

    /// Rows not yet started when `token` is cancelled are dropped from the outcome.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Scans the configured candidates for every row, one row at a time.
    pub fn evaluate(&self, rows: &[RawRow]) -> BatchOutcome<ScanReport> {
        self.run(rows, false, |index, row| {
            self.scan_row(index, row, &self.config.candidates)
        })
    }

    /// Scans `candidates` for every row, one row at a time.
    pub fn evaluate_with(&self, rows: &[RawRow], candidates: &[f64]) -> Result<BatchOutcome<ScanReport>> {
        validate::validate_candidates(candidates)?;
        Ok(self.run(rows, false, |index, row| {
            self.scan_row(index, row, candidates)
        }))
    }

    /// Like [`BatchEvaluator::evaluate_with`], spreading rows over the rayon pool.
    pub fn evaluate_parallel(
        &self,
        rows: &[RawRow],
        candidates: &[f64],
    ) -> Result<BatchOutcome<ScanReport>> {
        validate::validate_candidates(candidates)?;
        Ok(self.run(rows, true, |index, row| {
            self.scan_row(index, row, candidates)
        }))
    }

    /// Error magnitude of each row's own assumed SIA, rounded to the configured precision.
    pub fn evaluate_errors(&self, rows: &[RawRow]) -> BatchOutcome<f64> {
        self.run(rows, false, |index, row| {
            let case = row.parse(index, self.config.default_assumed_magnitude)?;
            Ok(round_to(case.evaluate().magnitude, self.config.precision))
        })
    }

    fn scan_row(&self, index: usize, row: &RawRow, candidates: &[f64]) -> RowOutcome<ScanReport> {
        let case = row.parse(index, self.config.default_assumed_magnitude)?;
        case.scan(candidates, self.config.precision)
            .map_err(|err| RowFault::from(err).at(index))
    }

    fn run<T, F>(&self, rows: &[RawRow], in_parallel: bool, f: F) -> BatchOutcome<T>
    where
        T: Send,
        F: Fn(usize, &RawRow) -> RowOutcome<T> + Sync,
    {
        let outcome = if in_parallel && self.cancel.is_none() {
            BatchOutcome {
                rows: parallel::par_map_limited(rows, self.config.max_concurrent_rows, f),
                cancelled: false,
            }
        } else if in_parallel {
            let mapped = parallel::par_map_cancellable(
                rows,
                self.config.max_concurrent_rows,
                self.cancel.as_ref(),
                f,
            );
            BatchOutcome {
                rows: mapped.results,
                cancelled: mapped.cancelled,
            }
        } else {
            let mut results = Vec::with_capacity(rows.len());
            let mut cancelled = false;
            for (index, row) in rows.iter().enumerate() {
                if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                    cancelled = true;
                    break;
                }
                results.push(f(index, row));
            }
            BatchOutcome {
                rows: results,
                cancelled,
            }
        };

        for failure in outcome.failures() {
            tracing::warn!("Batch {}", failure);
        }
        tracing::debug!(
            "Batch evaluated {} of {} rows, {} failed{}",
            outcome.len(),
            rows.len(),
            outcome.failures().count(),
            if outcome.cancelled { " (cancelled)" } else { "" }
        );

        outcome
    }
}

/// Scans `candidates` for every row with the default configuration.
pub fn evaluate_batch(rows: &[RawRow], candidates: &[f64]) -> Result<BatchOutcome<ScanReport>> {
    BatchEvaluator::default().evaluate_with(rows, candidates)
}

/// Error magnitude per row against each row's assumed SIA, or
/// `default_assumed_magnitude` where the row has none.
pub fn evaluate_batch_errors(rows: &[RawRow], default_assumed_magnitude: f64) -> BatchOutcome<f64> {
    let evaluator = BatchEvaluator {
        config: CalculatorConfig {
            default_assumed_magnitude,
            ..Default::default()
        },
        cancel: None,
    };
    evaluator.evaluate_errors(rows)
}

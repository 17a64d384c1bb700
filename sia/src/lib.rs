//! SIA - vectorial error of surgically induced astigmatism.
//!
//! Clinical cylinder values (magnitude, axis) cannot be subtracted directly
//! because an axis is an undirected line. This crate maps them into power
//! vectors, subtracts there, and reports the residual back in clinical form:
//! - [`power_vector`]: (magnitude, axis) <-> (J0, J45) codec
//! - [`vector_error`]: difference and vectorial error of two measurements
//! - [`scan`]: error over a list of hypothetical assumed-SIA magnitudes
//! - [`batch`]: row-wise evaluation with per-row failures
//!
//! # Quick Start
//!
//! ```rust
//! use sia::{AstigmatismMeasurement, CaseInput, DEFAULT_CANDIDATES};
//!
//! let actual = AstigmatismMeasurement::new(0.2, 90.0);
//! let case = CaseInput::new(90.0, actual, 0.5);
//!
//! let report = case.scan(&DEFAULT_CANDIDATES, 4).unwrap();
//! assert_eq!(report.best().assumed_magnitude, 0.2);
//! ```

pub mod batch;
pub mod config;
mod error;
pub mod laterality;
pub mod measurement;
pub mod power_vector;
pub mod scan;
pub mod validate;
pub mod vector_error;

// ============================================================================
// Core types
// ============================================================================

pub use error::{Error, Result, RowError, RowFault};
pub use laterality::Eye;
pub use measurement::{normalize_axis, AstigmatismMeasurement, CaseInput, ErrorResult};
pub use power_vector::{to_polar, to_vector, PowerVector, FLATTENING_SIGN};

// ============================================================================
// Evaluation
// ============================================================================

pub use batch::{
    evaluate_batch, evaluate_batch_errors, BatchEvaluator, BatchFile, BatchOutcome, Cell, RawRow,
};
pub use config::CalculatorConfig;
pub use scan::{
    best_and_worst, scan, scan_default, Candidate, CandidateTable, Extremes, Pick, ScanReport,
    DEFAULT_CANDIDATES, ERROR_DECIMALS,
};
pub use vector_error::{difference, error_of, residual_error};

pub use common::CancelToken;

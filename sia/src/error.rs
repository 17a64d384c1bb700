//! Error types for the SIA error engine.

use thiserror::Error;

/// Errors reported by the calculator core and its input boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("{field} = {value} is out of domain: {reason}")]
    Domain {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("No candidates to rank")]
    EmptyCandidateSet,

    #[error(transparent)]
    Row(#[from] RowError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single batch row. Other rows are unaffected.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("row {}: {fault}", .index + 1)]
pub struct RowError {
    /// Zero-based position of the row in the batch.
    pub index: usize,
    pub fault: RowFault,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowFault {
    #[error("missing value for '{field}'")]
    Missing { field: &'static str },

    #[error("'{field}' is not numeric: {text:?}")]
    NotNumeric { field: &'static str, text: String },

    #[error("'{field}' has unrecognized value {text:?}")]
    Unrecognized { field: &'static str, text: String },

    #[error("'{field}' = {value} is out of domain: {reason}")]
    OutOfDomain {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl RowFault {
    pub(crate) fn at(self, index: usize) -> RowError {
        RowError { index, fault: self }
    }
}

impl From<Error> for RowFault {
    fn from(err: Error) -> Self {
        match err {
            Error::Domain {
                field,
                value,
                reason,
            } => RowFault::OutOfDomain {
                field,
                value,
                reason,
            },
            Error::Row(row) => row.fault,
            other => RowFault::Unrecognized {
                field: "row",
                text: other.to_string(),
            },
        }
    }
}

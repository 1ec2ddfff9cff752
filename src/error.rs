//! Hard failures.
//!
//! Only conditions that prevent a run from starting are errors. Sparse
//! data and infeasible constraints are reported inside the result as
//! warnings or alerts.

use thiserror::Error;

use crate::source::SourceError;
use crate::validation::ValidationError;

/// Errors that abort a coverage run before any computation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request carried no school identifier.
    #[error("school_id is required")]
    MissingSchoolId,

    /// The request date was missing or not `YYYY-MM-DD`.
    #[error("invalid date: {0:?}")]
    InvalidDate(String),

    /// No school record exists for the identifier.
    #[error("school not found: {0}")]
    SchoolNotFound(String),

    /// The record store failed.
    #[error("roster source error: {0}")]
    Source(#[from] SourceError),

    /// Fetched records violate structural invariants.
    #[error("invalid input: {}", summarize(.0))]
    InvalidInput(Vec<ValidationError>),

    /// Engine configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A wall-clock string was not `HH:MM`.
    #[error("invalid clock time: {0:?}")]
    InvalidClockTime(String),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

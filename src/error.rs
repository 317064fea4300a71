// src/error.rs

use thiserror::Error;

/// Failures that abort a planning run.
///
/// An infeasible inventory model is NOT one of these: it is a regular
/// outcome of the solve and is reported through `PlanOutcome::Infeasible`.
#[derive(Debug, Error)]
pub enum PlanningError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("forecasting failed: {0}")]
    Forecast(String),

    #[error("solver failed: {0}")]
    Solver(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PlanningError>;

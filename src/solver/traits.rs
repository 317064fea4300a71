// src/solver/traits.rs

use std::fmt;

use tracing::debug;

use super::iis::{deletion_filter, Iis};
use super::model::MilpModel;
use crate::error::Result;

/// Engine-specific terminal codes other than optimal/infeasible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    Unbounded,
    /// The backend gave up; carries its own message.
    Failed(String),
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineStatus::Unbounded => f.write_str("unbounded"),
            EngineStatus::Failed(reason) => write!(f, "solver failure: {}", reason),
        }
    }
}

/// Variable values of an optimal solution, in model variable order.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub values: Vec<f64>,
    pub objective: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    Optimal(Solution),
    Infeasible,
    Other(EngineStatus),
}

impl SolveOutcome {
    pub fn is_infeasible(&self) -> bool {
        matches!(self, SolveOutcome::Infeasible)
    }
}

/// A general-purpose MILP engine.
///
/// The planner only builds declarative models and reads back the terminal
/// status, so any backend that can answer these two calls can be plugged in.
pub trait MilpEngine {
    fn solve(&self, model: &MilpModel) -> Result<SolveOutcome>;

    /// Irreducible infeasible subsystem of a model already known to be infeasible.
    ///
    /// The default runs a deletion filter on top of `solve`.
    fn compute_iis(&self, model: &MilpModel) -> Result<Iis> {
        debug!(
            constraints = model.num_constraints(),
            "Running deletion filter for IIS"
        );
        deletion_filter(self, model)
    }
}

// src/solver/engine.rs

//! `MilpEngine` backed by `good_lp` with the pure-Rust microlp solver.

use good_lp::{
    constraint, microlp, variable, Expression, ProblemVariables, ResolutionError, Solution as _,
    SolverModel, Variable as LpVariable,
};
use tracing::debug;

use super::model::{MilpModel, Sense, VarId, VarKind};
use super::traits::{EngineStatus, MilpEngine, Solution, SolveOutcome};
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpEngine;

fn linear_expression(columns: &[LpVariable], terms: impl Iterator<Item = (VarId, f64)>) -> Expression {
    terms
        .filter(|&(_, coef)| coef != 0.0)
        .fold(Expression::from(0.0), |acc, (var, coef)| acc + coef * columns[var.0])
}

impl MilpEngine for MicroLpEngine {
    fn solve(&self, model: &MilpModel) -> Result<SolveOutcome> {
        model.validate()?;

        let mut vars = ProblemVariables::new();
        let columns: Vec<LpVariable> = model
            .variables()
            .iter()
            .map(|var| {
                let definition = match var.kind {
                    VarKind::Binary => variable().integer().min(0.0).max(1.0),
                    VarKind::Continuous if var.upper.is_finite() => {
                        variable().min(var.lower).max(var.upper)
                    }
                    VarKind::Continuous => variable().min(var.lower),
                };
                vars.add(definition.name(var.name.clone()))
            })
            .collect();

        let objective = linear_expression(
            &columns,
            model.objective().iter().enumerate().map(|(j, &c)| (VarId(j), c)),
        );
        let mut problem = vars.minimise(objective).using(microlp);

        for con in model.constraints() {
            let lhs = linear_expression(&columns, con.terms.iter().copied());
            let rhs = con.rhs;
            problem = problem.with(match con.sense {
                Sense::LessEqual => constraint!(lhs <= rhs),
                Sense::GreaterEqual => constraint!(lhs >= rhs),
                Sense::Equal => constraint!(lhs == rhs),
            });
        }

        match problem.solve() {
            Ok(solution) => {
                let values: Vec<f64> = columns
                    .iter()
                    .zip(model.variables())
                    .map(|(&column, var)| {
                        let x = solution.value(column);
                        match var.kind {
                            VarKind::Binary => x.round(),
                            VarKind::Continuous => x,
                        }
                    })
                    .collect();
                let objective = model.evaluate(&values);
                debug!(model = %model.name, objective, "MILP solved to optimality");
                Ok(SolveOutcome::Optimal(Solution { values, objective }))
            }
            Err(ResolutionError::Infeasible) => {
                debug!(model = %model.name, "MILP is infeasible");
                Ok(SolveOutcome::Infeasible)
            }
            Err(ResolutionError::Unbounded) => Ok(SolveOutcome::Other(EngineStatus::Unbounded)),
            Err(other) => Ok(SolveOutcome::Other(EngineStatus::Failed(other.to_string()))),
        }
    }
}

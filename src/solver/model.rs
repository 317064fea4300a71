// src/solver/model.rs

//! Declarative MILP description handed to a `MilpEngine`.
//!
//! Minimize: Σ c_j x_j
//! Subject to:
//!   Σ a_ij x_j  (<= | >= | =)  b_i   for every constraint i
//!   lb_j <= x_j <= ub_j
//!   x_j ∈ {0, 1}                     for binary variables

use std::fmt;

use crate::error::{PlanningError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Continuous,
    Binary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub kind: VarKind,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Sense::LessEqual => "<=",
            Sense::GreaterEqual => ">=",
            Sense::Equal => "=",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub name: String,
    pub terms: Vec<(VarId, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MilpModel {
    pub name: String,
    variables: Vec<Variable>,
    objective: Vec<f64>,
    constraints: Vec<Constraint>,
}

impl MilpModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Continuous variable in `[lower, upper]`; `upper` may be `f64::INFINITY`.
    pub fn add_continuous(&mut self, name: impl Into<String>, lower: f64, upper: f64) -> VarId {
        self.push_variable(name.into(), VarKind::Continuous, lower, upper)
    }

    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        self.push_variable(name.into(), VarKind::Binary, 0.0, 1.0)
    }

    fn push_variable(&mut self, name: String, kind: VarKind, lower: f64, upper: f64) -> VarId {
        self.variables.push(Variable {
            name,
            kind,
            lower,
            upper,
        });
        self.objective.push(0.0);
        VarId(self.variables.len() - 1)
    }

    pub fn set_objective_coefficient(&mut self, var: VarId, coefficient: f64) {
        self.objective[var.0] = coefficient;
    }

    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        terms: Vec<(VarId, f64)>,
        sense: Sense,
        rhs: f64,
    ) -> ConstraintId {
        self.constraints.push(Constraint {
            name: name.into(),
            terms,
            sense,
            rhs,
        });
        ConstraintId(self.constraints.len() - 1)
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn constraint(&self, id: ConstraintId) -> &Constraint {
        &self.constraints[id.0]
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Same variables, only the listed constraints. Ids are NOT preserved.
    pub fn restricted_to(&self, keep: &[ConstraintId]) -> MilpModel {
        MilpModel {
            name: self.name.clone(),
            variables: self.variables.clone(),
            objective: self.objective.clone(),
            constraints: keep.iter().map(|c| self.constraints[c.0].clone()).collect(),
        }
    }

    /// Copy with every objective coefficient set to zero (pure feasibility).
    pub fn without_objective(&self) -> MilpModel {
        MilpModel {
            objective: vec![0.0; self.objective.len()],
            ..self.clone()
        }
    }

    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.objective.iter().zip(values).map(|(c, x)| c * x).sum()
    }

    /// Checks dimensions, bounds and coefficient finiteness.
    pub fn validate(&self) -> Result<()> {
        if self.variables.is_empty() {
            return Err(PlanningError::InvalidInput(format!(
                "model '{}' has no variables",
                self.name
            )));
        }
        for var in &self.variables {
            if !var.lower.is_finite() {
                return Err(PlanningError::InvalidInput(format!(
                    "variable '{}' needs a finite lower bound",
                    var.name
                )));
            }
            if var.upper.is_nan() || var.lower > var.upper {
                return Err(PlanningError::InvalidInput(format!(
                    "variable '{}' has invalid bounds [{}, {}]",
                    var.name, var.lower, var.upper
                )));
            }
        }
        if let Some(c) = self.objective.iter().find(|c| !c.is_finite()) {
            return Err(PlanningError::InvalidInput(format!(
                "objective coefficient {} is not finite",
                c
            )));
        }
        let n = self.variables.len();
        for con in &self.constraints {
            if !con.rhs.is_finite() {
                return Err(PlanningError::InvalidInput(format!(
                    "constraint '{}' has a non-finite right-hand side",
                    con.name
                )));
            }
            for (var, coef) in &con.terms {
                if var.0 >= n || !coef.is_finite() {
                    return Err(PlanningError::InvalidInput(format!(
                        "constraint '{}' has an invalid term",
                        con.name
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_var_model() -> MilpModel {
        let mut model = MilpModel::new("toy");
        let x = model.add_continuous("x", 0.0, f64::INFINITY);
        let y = model.add_binary("y");
        model.set_objective_coefficient(x, 2.0);
        model.set_objective_coefficient(y, 3.0);
        model.add_constraint("a", vec![(x, 1.0)], Sense::GreaterEqual, 1.0);
        model.add_constraint("b", vec![(x, 1.0), (y, -5.0)], Sense::LessEqual, 4.0);
        model
    }

    #[test]
    fn test_evaluate_and_lookup() {
        let model = two_var_model();
        assert_eq!(model.evaluate(&[2.0, 1.0]), 7.0);
        assert_eq!(model.constraint(ConstraintId(1)).name, "b");
    }

    #[test]
    fn test_without_objective_zeroes_costs() {
        let model = two_var_model().without_objective();
        assert_eq!(model.objective(), &[0.0, 0.0]);
        assert_eq!(model.num_constraints(), 2);
    }

    #[test]
    fn test_restricted_keeps_variables() {
        let model = two_var_model();
        let sub = model.restricted_to(&[ConstraintId(1)]);
        assert_eq!(sub.num_variables(), 2);
        assert_eq!(sub.num_constraints(), 1);
        assert_eq!(sub.constraints()[0].name, "b");
    }

    #[test]
    fn test_validate_rejects_infinite_lower_bound() {
        let mut model = MilpModel::new("bad");
        model.add_continuous("free", f64::NEG_INFINITY, 0.0);
        assert!(matches!(
            model.validate(),
            Err(PlanningError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        assert!(MilpModel::new("empty").validate().is_err());
    }
}

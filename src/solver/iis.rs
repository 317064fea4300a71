// src/solver/iis.rs

//! Irreducible infeasible subsystems and their LP-format export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use super::model::{Constraint, ConstraintId, MilpModel, VarId, VarKind, Variable};
use super::traits::MilpEngine;
use crate::error::{PlanningError, Result};

/// A minimal set of constraints that cannot be satisfied together.
///
/// Dropping any single member makes the remaining set feasible.
#[derive(Debug, Clone, PartialEq)]
pub struct Iis {
    pub model_name: String,
    pub constraints: Vec<Constraint>,
    /// Variables referenced by the member constraints, keyed by model id.
    pub variables: Vec<(VarId, Variable)>,
}

impl Iis {
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constraints.iter().any(|c| c.name == name)
    }

    pub fn constraint_names(&self) -> Vec<&str> {
        self.constraints.iter().map(|c| c.name.as_str()).collect()
    }

    fn variable_name(&self, id: VarId) -> &str {
        self.variables
            .iter()
            .find(|(v, _)| *v == id)
            .map_or("?", |(_, var)| var.name.as_str())
    }

    /// Writes the subsystem in CPLEX LP text so it can be inspected offline.
    pub fn write_lp(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut out = BufWriter::new(File::create(path)?);
        self.render(&mut out)?;
        out.flush()?;
        info!(
            path = %path.display(),
            constraints = self.constraints.len(),
            "Wrote irreducible infeasible subsystem"
        );
        Ok(())
    }

    fn render(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "\\ IIS of model '{}'", self.model_name)?;
        writeln!(out, "Minimize")?;
        writeln!(out, " obj: 0")?;
        writeln!(out, "Subject To")?;
        for con in &self.constraints {
            let lhs = con
                .terms
                .iter()
                .enumerate()
                .map(|(k, (var, coef))| format_term(k == 0, *coef, self.variable_name(*var)))
                .collect::<Vec<_>>()
                .join(" ");
            let lhs = if lhs.is_empty() { "0".to_string() } else { lhs };
            writeln!(out, " {}: {} {} {}", con.name, lhs, con.sense, con.rhs)?;
        }
        writeln!(out, "Bounds")?;
        for (_, var) in self.variables.iter().filter(|(_, v)| v.kind == VarKind::Continuous) {
            if var.upper.is_finite() {
                writeln!(out, " {} <= {} <= {}", var.lower, var.name, var.upper)?;
            } else {
                writeln!(out, " {} >= {}", var.name, var.lower)?;
            }
        }
        let binaries: Vec<&str> = self
            .variables
            .iter()
            .filter(|(_, v)| v.kind == VarKind::Binary)
            .map(|(_, v)| v.name.as_str())
            .collect();
        if !binaries.is_empty() {
            writeln!(out, "Binaries")?;
            writeln!(out, " {}", binaries.join(" "))?;
        }
        writeln!(out, "End")
    }
}

fn format_term(first: bool, coef: f64, name: &str) -> String {
    let sign = if coef < 0.0 { "-" } else { "+" };
    let magnitude = coef.abs();
    let body = if magnitude == 1.0 {
        name.to_string()
    } else {
        format!("{} {}", magnitude, name)
    };
    match (first, coef < 0.0) {
        (true, false) => body,
        _ => format!("{} {}", sign, body),
    }
}

/// Deletion filter: drop each constraint in turn and keep it dropped if the
/// rest is still infeasible. Probes use a zero objective since only
/// feasibility matters.
pub fn deletion_filter<E: MilpEngine + ?Sized>(engine: &E, model: &MilpModel) -> Result<Iis> {
    let probe = model.without_objective();

    if !engine.solve(&probe)?.is_infeasible() {
        return Err(PlanningError::Solver(format!(
            "model '{}' is feasible; no IIS exists",
            model.name
        )));
    }

    // Walk backwards so the constraints added first survive: the conflict
    // reported is the earliest one in model order.
    let mut kept: Vec<ConstraintId> = (0..model.num_constraints()).map(ConstraintId).collect();
    let mut k = kept.len();
    while k > 0 {
        k -= 1;
        let mut trial = kept.clone();
        trial.remove(k);
        if engine.solve(&probe.restricted_to(&trial))?.is_infeasible() {
            kept = trial;
        }
    }

    let constraints: Vec<Constraint> = kept.iter().map(|&c| model.constraint(c).clone()).collect();
    let mut referenced: Vec<usize> = constraints
        .iter()
        .flat_map(|c| c.terms.iter().map(|(v, _)| v.0))
        .collect();
    referenced.sort_unstable();
    referenced.dedup();

    Ok(Iis {
        model_name: model.name.clone(),
        constraints,
        variables: referenced
            .into_iter()
            .map(|j| (VarId(j), model.variables()[j].clone()))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::engine::MicroLpEngine;
    use crate::solver::model::Sense;

    /// x >= 10 and x <= 5 conflict; y <= 3 is an innocent bystander.
    fn conflicting_model() -> MilpModel {
        let mut model = MilpModel::new("conflict");
        let x = model.add_continuous("x", 0.0, f64::INFINITY);
        let y = model.add_continuous("y", 0.0, f64::INFINITY);
        let z = model.add_binary("z");
        model.set_objective_coefficient(x, 1.0);
        model.add_constraint("bystander", vec![(y, 1.0), (z, 1.0)], Sense::LessEqual, 3.0);
        model.add_constraint("floor", vec![(x, 1.0)], Sense::GreaterEqual, 10.0);
        model.add_constraint("ceiling", vec![(x, 1.0)], Sense::LessEqual, 5.0);
        model
    }

    #[test]
    fn test_deletion_filter_isolates_conflict() {
        let model = conflicting_model();
        let iis = MicroLpEngine.compute_iis(&model).unwrap();
        assert_eq!(iis.constraint_names(), vec!["floor", "ceiling"]);
        assert_eq!(iis.variables.len(), 1);
        assert_eq!(iis.variables[0].0, VarId(0));
    }

    #[test]
    fn test_iis_is_irreducible() {
        let model = conflicting_model();
        let engine = MicroLpEngine;
        let iis = engine.compute_iis(&model).unwrap();
        for skip in 0..iis.len() {
            let mut sub = MilpModel::new("check");
            sub.add_continuous("x", 0.0, f64::INFINITY);
            for (k, con) in iis.constraints.iter().enumerate() {
                if k != skip {
                    sub.add_constraint(con.name.clone(), con.terms.clone(), con.sense, con.rhs);
                }
            }
            assert!(!engine.solve(&sub).unwrap().is_infeasible());
        }
    }

    #[test]
    fn test_feasible_model_has_no_iis() {
        let mut model = MilpModel::new("fine");
        let x = model.add_continuous("x", 0.0, f64::INFINITY);
        model.add_constraint("floor", vec![(x, 1.0)], Sense::GreaterEqual, 1.0);
        let err = MicroLpEngine.compute_iis(&model).unwrap_err();
        assert!(matches!(err, PlanningError::Solver(_)));
    }

    #[test]
    fn test_write_lp_format() {
        let model = conflicting_model();
        let iis = MicroLpEngine.compute_iis(&model).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("infeasible_model.ilp");
        iis.write_lp(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("\\ IIS of model 'conflict'"));
        assert!(text.contains(" floor: x >= 10"));
        assert!(text.contains(" ceiling: x <= 5"));
        assert!(text.contains(" x >= 0"));
        assert!(!text.contains("Binaries"));
        assert!(text.trim_end().ends_with("End"));
    }

    #[test]
    fn test_format_term_signs() {
        assert_eq!(format_term(true, 1.0, "x"), "x");
        assert_eq!(format_term(true, -2.0, "x"), "- 2 x");
        assert_eq!(format_term(false, 100.0, "o"), "+ 100 o");
        assert_eq!(format_term(false, -1.0, "x"), "- x");
    }
}

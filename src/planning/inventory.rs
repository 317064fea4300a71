// src/planning/inventory.rs

//! Multi-period, multi-site inventory model.
//!
//! For every site `i` and period `t`:
//!
//! ```text
//! minimize    Σ holding_cost(i)·inventory[i,t] + order_cost(i)·order[i,t]
//! subject to  inventory[i,0] >= demand(0)
//!             inventory[i,t] >= inventory[i,t-1] - demand(t) + M·order[i,t]   (t > 0)
//!             0 <= inventory[i,t] <= capacity(i)
//!             order[i,t] ∈ {0, 1}
//! ```
//!
//! `demand(t)` is the network-wide forecast and is applied unchanged at every
//! site; it is not split across sites.

use std::fmt;

use tracing::{info, warn};

use super::config::PlanningConfig;
use crate::error::{PlanningError, Result};
use crate::model::plan::Plan;
use crate::model::series::DemandForecast;
use crate::model::site::Site;
use crate::solver::iis::Iis;
use crate::solver::model::{MilpModel, Sense, VarId};
use crate::solver::traits::{EngineStatus, MilpEngine, SolveOutcome};

const CHECK_TOL: f64 = 1e-6;

pub fn inventory_name(site: usize, period: usize) -> String {
    format!("inventory_{}_{}", site, period)
}

pub fn order_name(site: usize, period: usize) -> String {
    format!("order_{}_{}", site, period)
}

pub fn floor_name(site: usize) -> String {
    format!("floor_{}_0", site)
}

pub fn carry_name(site: usize, period: usize) -> String {
    format!("carry_{}_{}", site, period)
}

pub fn capacity_name(site: usize, period: usize) -> String {
    format!("capacity_{}_{}", site, period)
}

/// Result of planning: a plan, or a structured explanation of why none exists.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    Optimal(Plan),
    Infeasible(Iis),
    Other(EngineStatus),
}

/// The MILP together with the variable handles of each (site, period).
#[derive(Debug, Clone)]
pub struct InventoryModel {
    pub model: MilpModel,
    inventory: Vec<Vec<VarId>>,
    orders: Vec<Vec<VarId>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Negative,
    Capacity,
    InitialFloor,
    CarryForward,
}

/// A constraint broken by a candidate plan, and by how much.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub site: usize,
    pub period: usize,
    pub kind: ViolationKind,
    pub amount: f64,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} violated at site {} period {} by {:.6}",
            self.kind, self.site, self.period, self.amount
        )
    }
}

#[derive(Debug, Clone)]
pub struct InventoryProblem {
    sites: Vec<Site>,
    forecast: DemandForecast,
    big_m: f64,
}

impl InventoryProblem {
    pub fn new(sites: Vec<Site>, forecast: DemandForecast, big_m: f64) -> Result<Self> {
        if sites.is_empty() {
            return Err(PlanningError::InvalidInput(
                "at least one site is required".to_string(),
            ));
        }
        for site in &sites {
            site.validate()?;
        }
        if !(big_m.is_finite() && big_m > 0.0) {
            return Err(PlanningError::InvalidInput(format!(
                "replenishment quantity must be positive, got {}",
                big_m
            )));
        }

        if big_m < forecast.max_demand() {
            warn!(
                big_m,
                max_demand = forecast.max_demand(),
                "Replenishment quantity is below the peak forecast demand"
            );
        }
        if sites.len() > 1 {
            warn!(
                sites = sites.len(),
                "Network-wide demand is applied in full at every site; total stock scales with the number of sites"
            );
        }

        Ok(Self {
            sites,
            forecast,
            big_m,
        })
    }

    pub fn from_config(config: &PlanningConfig, forecast: DemandForecast) -> Result<Self> {
        Self::new(config.sites.clone(), forecast, config.replenishment_quantity)
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn forecast(&self) -> &DemandForecast {
        &self.forecast
    }

    pub fn periods(&self) -> usize {
        self.forecast.horizon()
    }

    pub fn build_model(&self) -> InventoryModel {
        let periods = self.periods();
        let mut model = MilpModel::new("Inventory Optimization");
        let mut inventory = Vec::with_capacity(self.sites.len());
        let mut orders = Vec::with_capacity(self.sites.len());

        for (i, site) in self.sites.iter().enumerate() {
            let mut x_row = Vec::with_capacity(periods);
            let mut o_row = Vec::with_capacity(periods);
            for t in 0..periods {
                let x = model.add_continuous(inventory_name(i, t), 0.0, f64::INFINITY);
                let o = model.add_binary(order_name(i, t));
                model.set_objective_coefficient(x, site.holding_cost);
                model.set_objective_coefficient(o, site.order_cost);
                x_row.push(x);
                o_row.push(o);
            }
            inventory.push(x_row);
            orders.push(o_row);
        }

        for t in 0..periods {
            let demand = self.forecast.demand(t);
            for (i, site) in self.sites.iter().enumerate() {
                let x = inventory[i][t];
                if t == 0 {
                    model.add_constraint(floor_name(i), vec![(x, 1.0)], Sense::GreaterEqual, demand);
                } else {
                    let terms = vec![(x, 1.0), (inventory[i][t - 1], -1.0), (orders[i][t], -self.big_m)];
                    model.add_constraint(carry_name(i, t), terms, Sense::GreaterEqual, -demand);
                }
                model.add_constraint(capacity_name(i, t), vec![(x, 1.0)], Sense::LessEqual, site.capacity);
            }
        }

        InventoryModel {
            model,
            inventory,
            orders,
        }
    }

    /// Builds and solves the model.
    ///
    /// An infeasible model is not an error: the engine is asked for an IIS,
    /// which comes back inside `PlanOutcome::Infeasible`.
    pub fn solve<E: MilpEngine + ?Sized>(&self, engine: &E) -> Result<PlanOutcome> {
        let built = self.build_model();
        info!(
            sites = self.sites.len(),
            periods = self.periods(),
            variables = built.model.num_variables(),
            constraints = built.model.num_constraints(),
            "Solving inventory model"
        );

        match engine.solve(&built.model)? {
            SolveOutcome::Optimal(solution) => {
                let inventory = built
                    .inventory
                    .iter()
                    .map(|row| row.iter().map(|v| solution.values[v.0].max(0.0)).collect())
                    .collect();
                let orders = built
                    .orders
                    .iter()
                    .map(|row| row.iter().map(|v| solution.values[v.0] > 0.5).collect())
                    .collect();
                let plan = Plan::new(inventory, orders, solution.objective);
                info!(
                    objective = plan.objective(),
                    orders = plan.order_count(),
                    "Optimal plan found"
                );
                Ok(PlanOutcome::Optimal(plan))
            }
            SolveOutcome::Infeasible => {
                warn!("Model is infeasible, computing irreducible infeasible subsystem");
                let iis = engine.compute_iis(&built.model)?;
                warn!(constraints = ?iis.constraint_names(), "Conflicting constraints");
                Ok(PlanOutcome::Infeasible(iis))
            }
            SolveOutcome::Other(status) => {
                warn!(%status, "Solver stopped without a definitive answer");
                Ok(PlanOutcome::Other(status))
            }
        }
    }

    /// Total holding plus ordering cost of an arbitrary assignment.
    pub fn plan_cost(&self, inventory: &[Vec<f64>], orders: &[Vec<bool>]) -> f64 {
        self.sites
            .iter()
            .enumerate()
            .map(|(i, site)| {
                let holding: f64 = inventory[i].iter().map(|x| site.holding_cost * x).sum();
                let ordering = orders[i].iter().filter(|&&o| o).count() as f64 * site.order_cost;
                holding + ordering
            })
            .sum()
    }

    /// Lists every constraint the plan breaks; empty means feasible.
    pub fn check_plan(&self, plan: &Plan) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut report = |site, period, kind, amount: f64| {
            if amount > CHECK_TOL {
                violations.push(Violation {
                    site,
                    period,
                    kind,
                    amount,
                });
            }
        };

        for (i, site) in self.sites.iter().enumerate() {
            for t in 0..self.periods() {
                let x = plan.inventory(i, t);
                let demand = self.forecast.demand(t);
                report(i, t, ViolationKind::Negative, -x);
                report(i, t, ViolationKind::Capacity, x - site.capacity);
                if t == 0 {
                    report(i, t, ViolationKind::InitialFloor, demand - x);
                } else {
                    let replenished = if plan.order(i, t) { self.big_m } else { 0.0 };
                    let floor = plan.inventory(i, t - 1) - demand + replenished;
                    report(i, t, ViolationKind::CarryForward, floor - x);
                }
            }
        }

        violations
    }

    /// A feasible plan built without the solver: never order, start at the
    /// first-period demand and draw stock down as demand arrives.
    ///
    /// Returns `None` when some site cannot hold the first-period demand.
    pub fn hold_only_plan(&self) -> Option<Plan> {
        let first = self.forecast.demand(0);
        if self.sites.iter().any(|s| s.capacity < first) {
            return None;
        }

        let inventory: Vec<Vec<f64>> = self
            .sites
            .iter()
            .map(|_| {
                let mut level = first;
                (0..self.periods())
                    .map(|t| {
                        if t > 0 {
                            level = (level - self.forecast.demand(t)).max(0.0);
                        }
                        level
                    })
                    .collect()
            })
            .collect();
        let orders = vec![vec![false; self.periods()]; self.sites.len()];
        let cost = self.plan_cost(&inventory, &orders);
        Some(Plan::new(inventory, orders, cost))
    }
}

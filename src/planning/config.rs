// src/planning/config.rs

use serde::{Deserialize, Serialize};

use crate::forecast::window_linear::WindowLinearConfig;
use crate::io::demand::HistoryConfig;
use crate::model::site::Site;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningConfig {
    pub sites: Vec<Site>,
    /// Units an order event adds to the carry-forward floor ("big M").
    /// Should exceed the largest plausible single-period demand.
    pub replenishment_quantity: f64,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            sites: Site::uniform(5, 500.0, 2.0, 10.0),
            replenishment_quantity: 100.0,
        }
    }
}

/// Everything one end-to-end run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Seed for the synthetic history.
    pub seed: u64,
    pub history: HistoryConfig,
    pub forecaster: WindowLinearConfig,
    pub planning: PlanningConfig,
    pub report_path: String,
    pub iis_path: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            history: HistoryConfig::default(),
            forecaster: WindowLinearConfig::default(),
            planning: PlanningConfig::default(),
            report_path: "plan_report.csv".to_string(),
            iis_path: "infeasible_model.ilp".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_network() {
        let config = PipelineConfig::default();
        assert_eq!(config.planning.sites.len(), 5);
        assert!(config.planning.sites.iter().all(|s| s.capacity == 500.0
            && s.holding_cost == 2.0
            && s.order_cost == 10.0));
        assert_eq!(config.planning.replenishment_quantity, 100.0);
        assert_eq!(config.forecaster.horizon, 30);
        assert_eq!(config.forecaster.input_size, 60);
        assert_eq!(config.history.days, 180);
    }
}

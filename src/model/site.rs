// src/model/site.rs

use serde::{Deserialize, Serialize};

use crate::error::{PlanningError, Result};

/// A warehouse taking part in the plan.
///
/// Parameters are fixed for the lifetime of one planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: usize,
    pub capacity: f64,     // Units that fit on the shelves
    pub holding_cost: f64, // Per unit, per period
    pub order_cost: f64,   // Per order event
}

impl Site {
    pub fn new(id: usize, capacity: f64, holding_cost: f64, order_cost: f64) -> Self {
        Self {
            id,
            capacity,
            holding_cost,
            order_cost,
        }
    }

    /// Builds `count` identical sites with ids `0..count`.
    pub fn uniform(count: usize, capacity: f64, holding_cost: f64, order_cost: f64) -> Vec<Site> {
        (0..count)
            .map(|id| Site::new(id, capacity, holding_cost, order_cost))
            .collect()
    }

    /// Rejects negative or non-finite parameters.
    ///
    /// A zero capacity is accepted: such a site cannot hold stock, which the
    /// solver reports as an infeasible plan rather than as bad input.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("capacity", self.capacity),
            ("holding_cost", self.holding_cost),
            ("order_cost", self.order_cost),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(PlanningError::InvalidInput(format!(
                    "site {}: {} must be a finite non-negative number, got {}",
                    self.id, name, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_assigns_sequential_ids() {
        let sites = Site::uniform(5, 500.0, 2.0, 10.0);
        assert_eq!(sites.len(), 5);
        for (i, site) in sites.iter().enumerate() {
            assert_eq!(site.id, i);
            assert_eq!(site.capacity, 500.0);
        }
    }

    #[test]
    fn test_validate_rejects_negative_cost() {
        let site = Site::new(3, 100.0, -1.0, 5.0);
        let err = site.validate().unwrap_err();
        assert!(err.to_string().contains("holding_cost"));
    }

    #[test]
    fn test_validate_rejects_nan_capacity() {
        assert!(Site::new(0, f64::NAN, 1.0, 1.0).validate().is_err());
    }

    #[test]
    fn test_validate_accepts_zero_capacity() {
        assert!(Site::new(0, 0.0, 1.0, 1.0).validate().is_ok());
    }
}

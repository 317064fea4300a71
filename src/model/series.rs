// src/model/series.rs

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{PlanningError, Result};

/// One row of a demand history table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub ds: NaiveDate,
    pub unique_id: String,
    pub y: f64,
}

/// Point forecast of network-wide demand, one value per planning period.
///
/// Values are finite and non-negative; the struct is read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandForecast {
    start: NaiveDate,
    values: Vec<f64>,
}

impl DemandForecast {
    pub fn new(start: NaiveDate, values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(PlanningError::InvalidInput(
                "demand forecast must cover at least one period".to_string(),
            ));
        }
        if let Some((t, v)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(PlanningError::InvalidInput(format!(
                "demand for period {} must be finite and non-negative, got {}",
                t, v
            )));
        }
        Ok(Self { start, values })
    }

    /// Convenience constructor for forecasts without a calendar anchor.
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
            .ok_or_else(|| PlanningError::InvalidInput("bad epoch date".to_string()))?;
        Self::new(epoch, values)
    }

    pub fn horizon(&self) -> usize {
        self.values.len()
    }

    /// Demand in period `t`. Panics if `t` is outside the horizon.
    pub fn demand(&self, t: usize) -> f64 {
        self.values[t]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Calendar date of period `t` (daily periods).
    pub fn date(&self, t: usize) -> NaiveDate {
        self.start + Duration::days(t as i64)
    }

    pub fn max_demand(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative_demand() {
        let err = DemandForecast::from_values(vec![1.0, -0.5]).unwrap_err();
        assert!(err.to_string().contains("period 1"));
    }

    #[test]
    fn test_rejects_empty_forecast() {
        assert!(DemandForecast::from_values(vec![]).is_err());
    }

    #[test]
    fn test_dates_are_daily() {
        let start = NaiveDate::from_ymd_opt(2023, 6, 29).unwrap();
        let forecast = DemandForecast::new(start, vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(forecast.date(2), NaiveDate::from_ymd_opt(2023, 7, 1).unwrap());
        assert_eq!(forecast.max_demand(), 3.0);
    }
}

// src/forecast/mean.rs

use chrono::NaiveDate;

use super::traits::{prepare_series, Forecaster};
use crate::error::{PlanningError, Result};
use crate::model::series::{DemandForecast, Observation};

/// Baseline that repeats the average of the most recent `window` days.
#[derive(Debug, Clone)]
pub struct MeanForecaster {
    pub window: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct MeanModel {
    pub level: f64,
    next_date: NaiveDate,
}

impl MeanForecaster {
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl Forecaster for MeanForecaster {
    type Model = MeanModel;

    fn fit(&self, history: &[Observation]) -> Result<MeanModel> {
        if self.window == 0 {
            return Err(PlanningError::Forecast("window must be positive".to_string()));
        }
        let (values, next_date) = prepare_series(history, self.window)?;
        let recent = &values[values.len() - self.window..];
        let level = recent.iter().sum::<f64>() / recent.len() as f64;
        Ok(MeanModel { level, next_date })
    }

    fn predict(&self, model: &MeanModel, horizon: usize) -> Result<DemandForecast> {
        DemandForecast::new(model.next_date, vec![model.level.max(0.0); horizon])
    }
}

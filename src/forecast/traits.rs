// src/forecast/traits.rs

use chrono::{Duration, NaiveDate};

use crate::error::{PlanningError, Result};
use crate::model::series::{DemandForecast, Observation};

/// A univariate point forecaster.
///
/// `fit` learns from a history table; `predict` produces a non-negative
/// forecast for the next `horizon` days, in period order.
pub trait Forecaster {
    type Model;

    fn fit(&self, history: &[Observation]) -> Result<Self::Model>;

    fn predict(&self, model: &Self::Model, horizon: usize) -> Result<DemandForecast>;
}

/// Validates a single-series daily history and returns its values plus the
/// first date after the history ends.
///
/// Dates must be strictly increasing and the series must hold at least
/// `min_len` observations.
pub fn prepare_series(history: &[Observation], min_len: usize) -> Result<(Vec<f64>, NaiveDate)> {
    let Some(first) = history.first() else {
        return Err(PlanningError::Forecast("history is empty".to_string()));
    };
    if history.len() < min_len {
        return Err(PlanningError::Forecast(format!(
            "history has {} observations, need at least {}",
            history.len(),
            min_len
        )));
    }
    if let Some(other) = history.iter().find(|o| o.unique_id != first.unique_id) {
        return Err(PlanningError::Forecast(format!(
            "expected a single series, found '{}' and '{}'",
            first.unique_id, other.unique_id
        )));
    }
    if let Some(pair) = history.windows(2).find(|w| w[1].ds <= w[0].ds) {
        return Err(PlanningError::Forecast(format!(
            "history dates must be strictly increasing ({} followed by {})",
            pair[0].ds, pair[1].ds
        )));
    }
    if let Some(bad) = history.iter().find(|o| !o.y.is_finite()) {
        return Err(PlanningError::Forecast(format!(
            "non-finite value on {}",
            bad.ds
        )));
    }

    let values = history.iter().map(|o| o.y).collect();
    // `history` is non-empty here.
    let last = history[history.len() - 1].ds;
    Ok((values, last + Duration::days(1)))
}

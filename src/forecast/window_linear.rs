// src/forecast/window_linear.rs

use chrono::NaiveDate;
use ndarray::{s, Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::traits::{prepare_series, Forecaster};
use crate::error::{PlanningError, Result};
use crate::model::series::{DemandForecast, Observation};

/// Knobs of the window-linear forecaster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowLinearConfig {
    /// Number of future days produced per window.
    pub horizon: usize,
    /// Lookback window length.
    pub input_size: usize,
    /// Gradient steps taken during `fit`.
    pub max_steps: usize,
    pub learning_rate: f64,
    /// Seed for the weight initialisation.
    pub seed: u64,
}

impl Default for WindowLinearConfig {
    fn default() -> Self {
        Self {
            horizon: 30,
            input_size: 60,
            max_steps: 100,
            learning_rate: 0.01,
            seed: 42,
        }
    }
}

/// Direct multi-horizon forecaster.
///
/// Maps the standardised last `input_size` observations straight to the next
/// `horizon` values with one linear layer. Training uses every sliding
/// window of the history and full-batch gradient descent on the squared error.
#[derive(Debug, Clone, Default)]
pub struct WindowLinearForecaster {
    pub config: WindowLinearConfig,
}

/// Fitted weights plus the context needed to forecast from the end of the history.
#[derive(Debug, Clone)]
pub struct WindowLinearModel {
    weights: Array2<f64>, // horizon x input_size
    bias: Array1<f64>,
    mean: f64,
    scale: f64,
    context: Array1<f64>, // Last `input_size` standardised observations
    next_date: NaiveDate,
    pub training_loss: f64,
}

impl WindowLinearModel {
    pub fn horizon(&self) -> usize {
        self.bias.len()
    }

    /// Predictions for a batch of windows, one row per window.
    fn forward(&self, windows: &Array2<f64>) -> Array2<f64> {
        windows.dot(&self.weights.t()) + &self.bias
    }
}

impl WindowLinearForecaster {
    pub fn new(config: WindowLinearConfig) -> Self {
        Self { config }
    }

    fn check_config(&self) -> Result<()> {
        let c = &self.config;
        if c.horizon == 0 || c.input_size == 0 {
            return Err(PlanningError::Forecast(
                "horizon and input_size must both be positive".to_string(),
            ));
        }
        if !(c.learning_rate.is_finite() && c.learning_rate > 0.0) {
            return Err(PlanningError::Forecast(format!(
                "learning rate must be positive, got {}",
                c.learning_rate
            )));
        }
        Ok(())
    }
}

impl Forecaster for WindowLinearForecaster {
    type Model = WindowLinearModel;

    fn fit(&self, history: &[Observation]) -> Result<WindowLinearModel> {
        self.check_config()?;
        let WindowLinearConfig {
            horizon,
            input_size,
            max_steps,
            learning_rate,
            seed,
        } = self.config;

        let (values, next_date) = prepare_series(history, input_size + horizon)?;

        let series = Array1::from(values);
        let mean = series.mean().unwrap_or(0.0);
        let std = series.std(0.0);
        let scale = if std > 0.0 { std } else { 1.0 };
        let z = series.mapv(|v| (v - mean) / scale);

        // Sliding windows: row w holds z[w..w + input_size] and the next `horizon` targets.
        let windows = z.len() - input_size - horizon + 1;
        let inputs = Array2::from_shape_fn((windows, input_size), |(w, j)| z[w + j]);
        let targets = Array2::from_shape_fn((windows, horizon), |(w, h)| z[w + input_size + h]);

        let mut rng = StdRng::seed_from_u64(seed);
        let init = Normal::new(0.0, 0.01).map_err(|e| PlanningError::Forecast(e.to_string()))?;
        let mut model = WindowLinearModel {
            weights: Array2::from_shape_fn((horizon, input_size), |_| init.sample(&mut rng)),
            bias: Array1::zeros(horizon),
            mean,
            scale,
            context: z.slice(s![z.len() - input_size..]).to_owned(),
            next_date,
            training_loss: f64::NAN,
        };

        info!(
            observations = z.len(),
            windows, horizon, input_size, max_steps, "Fitting window-linear forecaster"
        );

        let norm = 2.0 / windows as f64;
        for step in 0..max_steps {
            let error = model.forward(&inputs) - &targets;
            let grad_w = error.t().dot(&inputs);
            let grad_b = error.sum_axis(Axis(0));

            model.weights.scaled_add(-learning_rate * norm, &grad_w);
            model.bias.scaled_add(-learning_rate * norm, &grad_b);

            model.training_loss = error.mapv(|e| e * e).mean().unwrap_or(f64::NAN);
            if step % 25 == 0 {
                debug!(step, loss = model.training_loss, "Training step");
            }
        }

        info!(loss = model.training_loss, "Forecaster fitted");
        Ok(model)
    }

    fn predict(&self, model: &WindowLinearModel, horizon: usize) -> Result<DemandForecast> {
        if horizon == 0 || horizon > model.horizon() {
            return Err(PlanningError::Forecast(format!(
                "requested horizon {} but the model was trained for 1..={}",
                horizon,
                model.horizon()
            )));
        }

        let out = model.weights.dot(&model.context) + &model.bias;
        let values = out
            .iter()
            .take(horizon)
            .map(|z| (z * model.scale + model.mean).max(0.0))
            .collect();

        DemandForecast::new(model.next_date, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::demand::{generate_history, HistoryConfig};

    fn small_config() -> WindowLinearConfig {
        WindowLinearConfig {
            horizon: 5,
            input_size: 10,
            max_steps: 200,
            learning_rate: 0.01,
            seed: 7,
        }
    }

    fn constant_history(days: usize, value: f64) -> Vec<Observation> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        (0..days)
            .map(|k| Observation {
                ds: start + chrono::Duration::days(k as i64),
                unique_id: "product_A".to_string(),
                y: value,
            })
            .collect()
    }

    #[test]
    fn test_constant_series_forecasts_constant() {
        let forecaster = WindowLinearForecaster::new(small_config());
        let model = forecaster.fit(&constant_history(40, 120.0)).unwrap();
        let forecast = forecaster.predict(&model, 5).unwrap();

        assert_eq!(forecast.horizon(), 5);
        for v in forecast.values() {
            assert!((v - 120.0).abs() < 1e-6, "got {}", v);
        }
        assert_eq!(forecast.start(), NaiveDate::from_ymd_opt(2023, 2, 10).unwrap());
    }

    #[test]
    fn test_forecast_is_non_negative_and_in_range() {
        let history = generate_history(&HistoryConfig::default(), 42).unwrap();
        let forecaster = WindowLinearForecaster::default();
        let model = forecaster.fit(&history).unwrap();
        let forecast = forecaster.predict(&model, 30).unwrap();

        assert_eq!(forecast.horizon(), 30);
        for v in forecast.values() {
            assert!(*v >= 0.0);
            assert!(*v < 400.0, "forecast {} is far outside the history range", v);
        }
    }

    #[test]
    fn test_training_reduces_loss() {
        let history = generate_history(&HistoryConfig::default(), 1).unwrap();
        let short = WindowLinearForecaster::new(WindowLinearConfig {
            max_steps: 1,
            ..small_config()
        });
        let long = WindowLinearForecaster::new(small_config());
        let first = short.fit(&history).unwrap().training_loss;
        let last = long.fit(&history).unwrap().training_loss;
        assert!(last < first);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let history = generate_history(&HistoryConfig::default(), 3).unwrap();
        let forecaster = WindowLinearForecaster::new(small_config());
        let a = forecaster.predict(&forecaster.fit(&history).unwrap(), 5).unwrap();
        let b = forecaster.predict(&forecaster.fit(&history).unwrap(), 5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_batch_forward_matches_context_forecast() {
        let history = generate_history(&HistoryConfig::default(), 11).unwrap();
        let forecaster = WindowLinearForecaster::new(small_config());
        let model = forecaster.fit(&history).unwrap();

        let batch = model.context.clone().insert_axis(Axis(0));
        let row = model.forward(&batch);
        assert_eq!(row.shape(), &[1, 5]);

        let forecast = forecaster.predict(&model, 5).unwrap();
        for (z, v) in row.iter().zip(forecast.values()) {
            let expected = (z * model.scale + model.mean).max(0.0);
            assert!((expected - v).abs() < 1e-9);
        }
    }

    #[test]
    fn test_horizon_beyond_training_is_rejected() {
        let forecaster = WindowLinearForecaster::new(small_config());
        let model = forecaster.fit(&constant_history(40, 1.0)).unwrap();
        assert!(forecaster.predict(&model, 6).is_err());
        assert!(forecaster.predict(&model, 0).is_err());
    }

    #[test]
    fn test_history_too_short() {
        let forecaster = WindowLinearForecaster::new(small_config());
        let err = forecaster.fit(&constant_history(14, 1.0)).unwrap_err();
        assert!(matches!(err, PlanningError::Forecast(_)));
    }
}

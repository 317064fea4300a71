// src/io/demand.rs

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::error::{PlanningError, Result};
use crate::model::series::Observation;

/// Shape of the synthetic daily demand history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub series_id: String,
    pub start: NaiveDate,
    pub days: usize,
    /// Inclusive lower bound of the integer noise.
    pub low: i64,
    /// Exclusive upper bound of the integer noise.
    pub high: i64,
    /// Amplitude of the seasonal sine term.
    pub amplitude: f64,
    /// The sine argument runs linearly from 0 to `span` over the history.
    pub span: f64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            series_id: "product_A".to_string(),
            start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            days: 180,
            low: 50,
            high: 200,
            amplitude: 10.0,
            span: 20.0,
        }
    }
}

/// Generates a daily demand history: uniform integer noise in `[low, high)`
/// plus a slow sine wave.
///
/// The same `seed` always yields the same series.
pub fn generate_history(config: &HistoryConfig, seed: u64) -> Result<Vec<Observation>> {
    if config.days == 0 {
        return Err(PlanningError::InvalidInput(
            "history must span at least one day".to_string(),
        ));
    }
    if config.low >= config.high {
        return Err(PlanningError::InvalidInput(format!(
            "empty noise range [{}, {})",
            config.low, config.high
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Uniform::new(config.low, config.high);

    // linspace(0, span, days): first and last points included.
    let step = if config.days > 1 {
        config.span / (config.days - 1) as f64
    } else {
        0.0
    };

    let mut history = Vec::with_capacity(config.days);
    for k in 0..config.days {
        let base = noise.sample(&mut rng) as f64;
        let seasonal = config.amplitude * (step * k as f64).sin();
        history.push(Observation {
            ds: config.start + Duration::days(k as i64),
            unique_id: config.series_id.clone(),
            y: base + seasonal,
        });
    }

    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_shape() {
        let config = HistoryConfig::default();
        let history = generate_history(&config, 42).unwrap();

        assert_eq!(history.len(), 180);
        assert_eq!(history[0].ds, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(history[179].ds, NaiveDate::from_ymd_opt(2023, 6, 29).unwrap());
        assert!(history.iter().all(|o| o.unique_id == "product_A"));
    }

    #[test]
    fn test_values_stay_in_band() {
        let history = generate_history(&HistoryConfig::default(), 42).unwrap();
        for o in &history {
            assert!(o.y >= 50.0 - 10.0 && o.y < 200.0 + 10.0, "value {} out of band", o.y);
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let config = HistoryConfig::default();
        assert_eq!(
            generate_history(&config, 7).unwrap(),
            generate_history(&config, 7).unwrap()
        );
        assert_ne!(
            generate_history(&config, 7).unwrap(),
            generate_history(&config, 8).unwrap()
        );
    }

    #[test]
    fn test_rejects_empty_range() {
        let config = HistoryConfig {
            low: 10,
            high: 10,
            ..HistoryConfig::default()
        };
        assert!(generate_history(&config, 1).is_err());
    }
}

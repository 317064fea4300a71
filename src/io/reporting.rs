// src/io/reporting.rs

use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::model::plan::Plan;
use crate::model::series::DemandForecast;

/// One period of the forecast-vs-inventory comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanRecord {
    pub period: usize,
    pub date: NaiveDate,
    pub forecast: f64,
    /// Naive baseline forecast for the same day.
    pub baseline: f64,
    pub total_inventory: f64,
    pub orders_placed: usize,
}

/// Pairs the forecast and its baseline with on-hand stock summed over all sites.
pub fn summarize(plan: &Plan, forecast: &DemandForecast, baseline: &DemandForecast) -> Vec<PlanRecord> {
    let periods = plan.period_count().min(forecast.horizon()).min(baseline.horizon());
    (0..periods)
        .map(|t| PlanRecord {
            period: t,
            date: forecast.date(t),
            forecast: forecast.demand(t),
            baseline: baseline.demand(t),
            total_inventory: plan.total_inventory(t),
            orders_placed: plan.orders_in_period(t),
        })
        .collect()
}

/// Writes the plan summary to a CSV file.
///
/// # Arguments
/// * `file_path` - Where to save the file (e.g., "plan_report.csv").
/// * `data` - Rows produced by `summarize`.
pub fn write_plan_report(file_path: impl AsRef<Path>, data: &[PlanRecord]) -> Result<()> {
    let path = file_path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;

    for record in data {
        wtr.serialize(record)?;
    }

    wtr.flush()?;

    info!(rows = data.len(), path = %path.display(), "Exported plan report");
    Ok(())
}

/// Mean absolute gap between the forecast and the baseline.
pub fn baseline_gap(records: &[PlanRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records.iter().map(|r| (r.forecast - r.baseline).abs()).sum::<f64>() / records.len() as f64
}

/// Prints the comparison table to stdout.
pub fn print_summary(records: &[PlanRecord], objective: f64) {
    println!("\n=== Forecast vs Optimized Inventory ===");
    println!(
        "{:>6}  {:>10}  {:>12}  {:>12}  {:>15}  {:>6}",
        "Period", "Date", "Forecast", "Baseline", "Inventory", "Orders"
    );
    for r in records {
        println!(
            "{:>6}  {:>10}  {:>12.2}  {:>12.2}  {:>15.2}  {:>6}",
            r.period, r.date, r.forecast, r.baseline, r.total_inventory, r.orders_placed
        );
    }
    println!("Mean |forecast - baseline|: {:.2}", baseline_gap(records));
    println!("Total plan cost: ${:.2}", objective);
}

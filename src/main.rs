use inventory_milp::forecast::mean::MeanForecaster;
use inventory_milp::forecast::traits::Forecaster;
use inventory_milp::forecast::window_linear::WindowLinearForecaster;
use inventory_milp::io::{demand, reporting};
use inventory_milp::planning::config::PipelineConfig;
use inventory_milp::planning::inventory::{InventoryProblem, PlanOutcome};
use inventory_milp::solver::engine::MicroLpEngine;
use inventory_milp::{telemetry, PlanningError};
use tracing::info;

fn main() -> Result<(), PlanningError> {
    telemetry::init();
    println!("=== Demand Forecast + MILP Inventory Planning ===");

    // 1. SETUP CONFIGURATION
    let config = PipelineConfig::default();

    // 2. GENERATE DEMAND HISTORY
    let history = demand::generate_history(&config.history, config.seed)?;
    info!(
        days = history.len(),
        series = %config.history.series_id,
        "Demand history generated"
    );

    // 3. FIT THE FORECASTER AND PREDICT THE PLANNING HORIZON
    let forecaster = WindowLinearForecaster::new(config.forecaster.clone());
    let trained = forecaster.fit(&history)?;
    let forecast = forecaster.predict(&trained, config.forecaster.horizon)?;

    let baseline_forecaster = MeanForecaster::new(config.forecaster.input_size);
    let baseline_model = baseline_forecaster.fit(&history)?;
    let baseline = baseline_forecaster.predict(&baseline_model, forecast.horizon())?;
    let forecast_mean = forecast.values().iter().sum::<f64>() / forecast.horizon() as f64;
    info!(
        forecast_mean,
        baseline_level = baseline_model.level,
        start = %forecast.start(),
        "Forecast ready"
    );

    // 4. BUILD AND SOLVE THE INVENTORY MODEL
    let problem = InventoryProblem::from_config(&config.planning, forecast.clone())?;
    let engine = MicroLpEngine;

    match problem.solve(&engine)? {
        PlanOutcome::Optimal(plan) => {
            // 5. REPORT
            let records = reporting::summarize(&plan, &forecast, &baseline);
            reporting::print_summary(&records, plan.objective());
            reporting::write_plan_report(&config.report_path, &records)?;
            println!("Plan written to ./{}", config.report_path);
        }
        PlanOutcome::Infeasible(iis) => {
            println!("Model is infeasible. Conflicting constraints:");
            for name in iis.constraint_names() {
                println!("  {}", name);
            }
            iis.write_lp(&config.iis_path)?;
            println!("Feasibility analysis written to ./{}", config.iis_path);
        }
        PlanOutcome::Other(status) => {
            eprintln!("Solver stopped without a plan: {}", status);
        }
    }

    Ok(())
}

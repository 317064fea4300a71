//! Forecast-driven inventory planning.
//!
//! A demand forecaster produces a daily forecast for one product; the
//! planner turns that forecast into a mixed-integer program over a network
//! of warehouses and solves it for the cheapest stock and ordering plan.

pub mod error;
pub mod forecast;
pub mod io;
pub mod model;
pub mod planning;
pub mod solver;
pub mod telemetry;

pub use error::{PlanningError, Result};

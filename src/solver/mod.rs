pub mod engine;
pub mod iis;
pub mod model;
pub mod traits;

pub mod plan;
pub mod series;
pub mod site;

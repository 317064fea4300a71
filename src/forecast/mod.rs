pub mod mean;
pub mod traits;
pub mod window_linear;

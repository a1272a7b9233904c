//! Pure business services.

pub mod change_detection;
pub mod config_resolution;

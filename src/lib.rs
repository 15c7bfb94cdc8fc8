pub mod api;
pub mod config;
pub mod ml;
pub mod state;
pub mod telemetry;
pub mod views;

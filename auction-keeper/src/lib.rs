pub mod auction;
pub mod config;
pub mod kernel;
pub mod per_metrics;
pub mod server;

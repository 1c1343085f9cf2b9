pub mod aggregator;
pub mod api;
pub mod azure;
pub mod cli;
pub mod config;
pub mod errors;
pub mod models;

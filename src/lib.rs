pub mod cli;
pub mod compute;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod output;
pub mod rng;
pub mod runtime;
pub mod store;

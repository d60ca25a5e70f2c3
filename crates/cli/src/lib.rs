//! `meublerp` command-line tool: price, fetch and render supplier purchase orders.

pub mod commands;
pub mod config;

pub use commands::OutputFormat;
pub use config::AppConfig;

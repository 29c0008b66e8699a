//! Optimization statistics and insights for an AI cost-optimization dashboard

pub mod cli;
pub mod config;
pub mod format;
pub mod logging;
pub mod services;
pub mod tui;
pub mod types;

//! TUI widgets

pub mod help;
pub mod insights;
pub mod models;
pub mod overview;
pub mod recommendations;
pub mod spinner;
pub mod tabs;

// Zonecast application: configuration, orchestration and the terminal chart
// viewer.

pub mod app;
pub mod config;
pub mod tui;

//! Methane emission explorer: load a table once, filter it along five
//! cascading dimensions and project the result into chart-ready rows.

pub mod app;
pub mod assets;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;

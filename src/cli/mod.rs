//! CLI command handlers

pub mod commands;

pub use commands::{build, inspect, layout};

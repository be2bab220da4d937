//! CLI command handlers

pub mod commands;

pub use commands::{export, groups, inspect, show, split, upload};

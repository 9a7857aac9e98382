//! CLI command handlers

mod commands;

pub use commands::{correct, inspect, layout, EXTENSION_MESSAGE};

//! CLI command handlers

pub mod commands;

pub use commands::{export, resolve, sheets, show, summary, LoadOptions};

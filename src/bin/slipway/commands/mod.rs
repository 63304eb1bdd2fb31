//! Command implementations for the Slipway CLI.

pub mod clean;
pub mod completions;
pub mod generate;
pub mod targets;

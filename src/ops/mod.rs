//! High-level operations.
//!
//! This module contains the implementation of Slipway commands.

pub mod clean;
pub mod generate;

pub use clean::clean;
pub use generate::{dump_model, find_manifest, generate, load_project, GenerateOptions, MANIFEST_NAME};

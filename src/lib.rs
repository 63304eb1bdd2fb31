//! Slipway - a build-script generator.
//!
//! This crate provides the core library functionality for Slipway: the
//! project/configuration resolution engine, the path and naming utilities
//! it depends on, and the backends that render the resolved model into
//! native build files.

pub mod backend;
pub mod core;
pub mod ops;
pub mod util;

pub use crate::core::{
    Language, ModelError, Package, Platform, Project, ProjectConfig, ProjectOption, QueryError,
    ResolvedConfig, Scope, SettingsBlock, TargetKind, TreeEvent,
};

pub use crate::backend::{Backend, BackendOptions, BackendRegistry};

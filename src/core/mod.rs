//! Core configuration model: the entity graph, its cascade resolution,
//! target naming, and the query façade emitters read through.

pub mod config;
pub mod errors;
pub mod kind;
pub mod naming;
pub mod package;
pub mod project;
pub mod query;
pub mod schema;
pub mod sourcetree;

pub use config::{ConfigBlock, ResolvedConfig, SettingsBlock};
pub use errors::{ModelError, QueryError};
pub use kind::{Language, Platform, TargetKind};
pub use package::{FileConfig, Package};
pub use project::{Project, ProjectConfig, ProjectOption};
pub use query::Scope;
pub use sourcetree::TreeEvent;

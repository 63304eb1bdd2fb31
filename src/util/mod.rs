//! Shared utilities

pub mod diagnostic;
pub mod fs;
pub mod guid;
pub mod path;

pub use diagnostic::Diagnostic;
pub use path::PathStyle;

//! Model and query error types with user-facing diagnostics.

use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Violation of a configuration-model invariant.
///
/// These are fatal: generation must abort before any output is written.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("duplicate package name `{name}`")]
    DuplicatePackageName { name: String },

    #[error(
        "package `{package}` has {found} configuration blocks, project defines {expected}"
    )]
    ConfigCountMismatch {
        package: String,
        expected: usize,
        found: usize,
    },

    #[error(
        "package `{package}` configuration {index} is named `{found}`, expected `{expected}`"
    )]
    ConfigNameMismatch {
        package: String,
        index: usize,
        expected: String,
        found: String,
    },

    #[error("package `{package}` has {files} files but {file_configs} file configs")]
    FileConfigCountMismatch {
        package: String,
        files: usize,
        file_configs: usize,
    },

    #[error("package `{package}` names unknown configuration `{name}`")]
    UnknownConfig { package: String, name: String },

    #[error("package `{package}`: {message}")]
    InvalidPackage { package: String, message: String },
}

impl ModelError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ModelError::DuplicatePackageName { name } => {
                Diagnostic::error(format!("duplicate package name `{}`", name))
                    .with_context("package names are the key sibling links resolve against")
                    .with_suggestion("Rename one of the packages so every name is unique")
            }

            ModelError::ConfigCountMismatch {
                package,
                expected,
                found,
            } => Diagnostic::error(format!(
                "package `{}` defines {} configurations, the project defines {}",
                package, found, expected
            ))
            .with_suggestion("Give every package one block per project configuration"),

            ModelError::ConfigNameMismatch {
                package,
                index,
                expected,
                found,
            } => Diagnostic::error(format!(
                "package `{}` configuration {} is named `{}`",
                package, index, found
            ))
            .with_context(format!("the project configuration at that index is `{}`", expected))
            .with_suggestion("Keep package configuration blocks in project order"),

            ModelError::FileConfigCountMismatch {
                package,
                files,
                file_configs,
            } => Diagnostic::error(format!(
                "package `{}` has {} files but {} file configs",
                package, files, file_configs
            ))
            .with_suggestion("File configs must parallel the file list one-to-one"),

            ModelError::UnknownConfig { package, name } => Diagnostic::error(format!(
                "package `{}` names unknown configuration `{}`",
                package, name
            ))
            .with_suggestion("Declare the configuration at the project level first"),

            ModelError::InvalidPackage { package, message } => {
                Diagnostic::error(format!("package `{}`: {}", package, message))
            }
        }
    }
}

/// Failure of a read-only query against the resolved model.
///
/// Reported to the caller as a typed error, never a silent default.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("no package named `{name}`")]
    UnknownPackage { name: String },

    #[error("package index {index} out of range ({count} packages)")]
    PackageIndexOutOfRange { index: usize, count: usize },

    #[error("configuration index {index} out of range ({count} configurations)")]
    ConfigIndexOutOfRange { index: usize, count: usize },
}

impl QueryError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            QueryError::UnknownPackage { name } => {
                Diagnostic::error(format!("no package named `{}`", name))
                    .with_suggestion("Check the spelling; sibling links match by exact name")
            }
            QueryError::PackageIndexOutOfRange { index, count } => Diagnostic::error(format!(
                "package index {} out of range ({} packages)",
                index, count
            )),
            QueryError::ConfigIndexOutOfRange { index, count } => Diagnostic::error(format!(
                "configuration index {} out of range ({} configurations)",
                index, count
            )),
        }
    }
}

//! Project - the root of the configuration model.
//!
//! A Project owns its build configurations, packages, and user-visible
//! options. The external loader constructs the full graph in one pass;
//! after that the graph is immutable for the rest of the run, except for
//! the per-package backend payload attached during generation.

use serde::{Deserialize, Serialize};

use crate::core::errors::ModelError;
use crate::core::package::Package;
use crate::util::path;

/// One project-wide build configuration with its default output dirs.
///
/// Shared by index with every package's configuration list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Configuration name (e.g. "Debug")
    pub name: String,

    /// Default binaries directory
    #[serde(default = "default_dir", rename = "bindir")]
    pub bin_dir: String,

    /// Default libraries directory
    #[serde(default = "default_dir", rename = "libdir")]
    pub lib_dir: String,
}

fn default_dir() -> String {
    ".".to_string()
}

impl ProjectConfig {
    /// Create a configuration with default output directories.
    pub fn new(name: impl Into<String>) -> Self {
        ProjectConfig {
            name: name.into(),
            bin_dir: default_dir(),
            lib_dir: default_dir(),
        }
    }

    /// Set the default binaries directory.
    pub fn with_bin_dir(mut self, dir: impl Into<String>) -> Self {
        self.bin_dir = path::neutral(&dir.into());
        self
    }

    /// Set the default libraries directory.
    pub fn with_lib_dir(mut self, dir: impl Into<String>) -> Self {
        self.lib_dir = path::neutral(&dir.into());
        self
    }
}

/// A user-visible option flag surfaced by the project description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectOption {
    /// Flag name, without leading dashes
    pub flag: String,

    /// Human-readable description
    pub description: String,
}

/// The root of the configuration model.
#[derive(Debug)]
pub struct Project {
    /// Project name
    pub name: String,

    /// Root path the generated scripts are written under
    pub path: String,

    /// Ordered build configurations
    pub configs: Vec<ProjectConfig>,

    /// Ordered packages
    pub packages: Vec<Package>,

    /// Ordered user-visible options
    pub options: Vec<ProjectOption>,
}

impl Project {
    /// Create an empty project.
    pub fn new(name: impl Into<String>, root: impl Into<String>) -> Self {
        Project {
            name: name.into(),
            path: path::neutral(&root.into()),
            configs: Vec::new(),
            packages: Vec::new(),
            options: Vec::new(),
        }
    }

    /// Find a package index by exact name match.
    pub fn package_index(&self, name: &str) -> Option<usize> {
        self.packages.iter().position(|p| p.name == name)
    }

    /// Find a package by exact name match.
    pub fn package(&self, name: &str) -> Option<&Package> {
        self.package_index(name).map(|i| &self.packages[i])
    }

    /// Check the model invariants.
    ///
    /// Must pass before any generation output is written: every package
    /// carries exactly one configuration block per project configuration
    /// (same index, same name), file configs parallel the file list, and
    /// package names are unique.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (i, package) in self.packages.iter().enumerate() {
            if self.packages[..i].iter().any(|p| p.name == package.name) {
                return Err(ModelError::DuplicatePackageName {
                    name: package.name.clone(),
                });
            }

            if package.configs.len() != self.configs.len() {
                return Err(ModelError::ConfigCountMismatch {
                    package: package.name.clone(),
                    expected: self.configs.len(),
                    found: package.configs.len(),
                });
            }

            for (j, block) in package.configs.iter().enumerate() {
                if block.name != self.configs[j].name {
                    return Err(ModelError::ConfigNameMismatch {
                        package: package.name.clone(),
                        index: j,
                        expected: self.configs[j].name.clone(),
                        found: block.name.clone(),
                    });
                }
            }

            if package.file_configs.len() != package.files.len() {
                return Err(ModelError::FileConfigCountMismatch {
                    package: package.name.clone(),
                    files: package.files.len(),
                    file_configs: package.file_configs.len(),
                });
            }
        }

        Ok(())
    }
}

//! Build-file backends.
//!
//! A backend renders the resolved model into one build tool's file format.
//! The core stays backend-agnostic: backends drive the query façade, never
//! the model's internals, and stash whatever per-package identity their
//! format needs in the package's extension slot.

mod gnu;
mod vs;

use std::collections::BTreeMap;

use anyhow::Result;

use crate::core::kind::Platform;
use crate::core::project::Project;

pub use gnu::GnuBackend;
pub use vs::VsBackend;

/// Options shared by every backend.
#[derive(Debug, Clone)]
pub struct BackendOptions {
    /// Platform the generated files will build on
    pub platform: Platform,

    /// Compiler family for makefile-style outputs (e.g. `gcc`, `dmc`)
    pub cc: String,
}

impl Default for BackendOptions {
    fn default() -> Self {
        BackendOptions {
            platform: Platform::host(),
            cc: "gcc".to_string(),
        }
    }
}

/// Interface for build-file backends.
///
/// `assign_identities` runs once per run, before any rendering; rendering
/// itself is pure and returns the script text for the ops layer to write.
pub trait Backend {
    /// Format name used on the command line.
    fn name(&self) -> &'static str;

    /// Attach per-package identity payloads (GUIDs and the like).
    fn assign_identities(&self, project: &Project) -> Result<()>;

    /// Generated script path for one package, relative to the project root.
    fn target_script(&self, project: &Project, package_index: usize) -> String;

    /// Render one package's build script.
    fn render_target(&self, project: &Project, package_index: usize) -> Result<String>;

    /// Aggregate script path (master makefile, solution), project-relative.
    fn aggregate_script(&self, project: &Project) -> String;

    /// Render the aggregate script.
    fn render_aggregate(&self, project: &Project) -> Result<String>;
}

/// Registry of available backends, keyed by format name.
///
/// Construction never fails and does no I/O.
pub struct BackendRegistry {
    backends: BTreeMap<&'static str, Box<dyn Backend>>,
}

impl BackendRegistry {
    /// Create a registry with every built-in backend.
    pub fn new(options: BackendOptions) -> Self {
        let mut registry = BackendRegistry {
            backends: BTreeMap::new(),
        };
        registry.register(Box::new(GnuBackend::new(options.clone())));
        registry.register(Box::new(VsBackend::new()));
        registry
    }

    /// Register a backend.
    pub fn register(&mut self, backend: Box<dyn Backend>) {
        self.backends.insert(backend.name(), backend);
    }

    /// Look up a backend by format name.
    pub fn get(&self, name: &str) -> Option<&dyn Backend> {
        self.backends.get(name).map(|b| b.as_ref())
    }

    /// All registered format names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.backends.keys().copied().collect()
    }

    /// All registered backends.
    pub fn all(&self) -> impl Iterator<Item = &dyn Backend> + '_ {
        self.backends.values().map(|b| b.as_ref())
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        BackendRegistry::new(BackendOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_builtins() {
        let registry = BackendRegistry::default();
        assert_eq!(registry.names(), vec!["gnu", "vs2003"]);
        assert!(registry.get("gnu").is_some());
        assert!(registry.get("xcode").is_none());
    }
}

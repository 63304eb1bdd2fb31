//! Package - one buildable unit within a project.

use std::any::Any;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::core::config::{ConfigBlock, SettingsBlock};
use crate::core::kind::{Language, TargetKind};
use crate::util::path;

/// Per-file settings, for files whose handling cannot be inferred from
/// their extension.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FileConfig {
    /// Explicit build-action tag (e.g. `Compile`, `EmbeddedResource`)
    #[serde(default)]
    pub build_action: Option<String>,
}

/// One buildable unit: a library or executable inside a project.
///
/// `configs` is always index-aligned with the owning project's
/// configuration list; `file_configs` is index-aligned with `files`.
pub struct Package {
    /// Package name, unique within the project; the key sibling links
    /// are resolved against
    pub name: String,

    /// Path relative to the project root, neutral separators
    pub path: String,

    /// Source language
    pub language: Language,

    /// Kind of artifact this package builds
    pub kind: TargetKind,

    /// Deployment URL, for web targets
    pub url: Option<String>,

    /// Member source files, project-relative, order preserved
    pub files: Vec<String>,

    /// Per-file settings, parallel to `files`
    pub file_configs: Vec<FileConfig>,

    /// Package-scope settings
    pub settings: SettingsBlock,

    /// Per-configuration settings, index-aligned with the project configs
    pub configs: Vec<ConfigBlock>,

    /// Opaque per-backend payload, set once per run during generation
    backend_data: OnceLock<Box<dyn Any + Send + Sync>>,
}

impl Package {
    /// Create a new package with the given name and path.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Package {
            name: name.into(),
            path: path::neutral(&path.into()),
            language: Language::default(),
            kind: TargetKind::default(),
            url: None,
            files: Vec::new(),
            file_configs: Vec::new(),
            settings: SettingsBlock::default(),
            configs: Vec::new(),
            backend_data: OnceLock::new(),
        }
    }

    /// Set the language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Set the target kind.
    pub fn with_kind(mut self, kind: TargetKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the member files, giving each a default file config.
    pub fn with_files(mut self, files: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.files = files.into_iter().map(|f| path::neutral(&f.into())).collect();
        self.file_configs = vec![FileConfig::default(); self.files.len()];
        self
    }

    /// Look up the per-file settings for a member file.
    pub fn file_config(&self, file: &str) -> Option<&FileConfig> {
        self.files
            .iter()
            .position(|f| f == file)
            .map(|i| &self.file_configs[i])
    }

    /// Find the first member file with the given extension (without dot).
    ///
    /// Used to special-case files such as a module-definition file.
    pub fn find_file_with_extension(&self, ext: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|f| path::split_extension(f).1 == ext)
            .map(String::as_str)
    }

    /// Attach the backend's per-package payload.
    ///
    /// The slot can be written once per run; returns false if it was
    /// already occupied.
    pub fn attach_backend_data<T: Any + Send + Sync>(&self, data: T) -> bool {
        self.backend_data.set(Box::new(data)).is_ok()
    }

    /// Read back the backend payload, if one of type `T` was attached.
    pub fn backend_data<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.backend_data.get().and_then(|d| d.downcast_ref::<T>())
    }
}

impl fmt::Debug for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Package")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("language", &self.language)
            .field("kind", &self.kind)
            .field("files", &self.files.len())
            .field("configs", &self.configs.len())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

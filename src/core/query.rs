//! Query façade: the read-only API emitters pull resolved data through.
//!
//! The legacy interface kept a hidden global cursor for the active package
//! and configuration; here selection returns an explicit `Scope` that
//! carries the pair, so queries are test-isolated and cannot silently
//! default. Selecting a package always starts at its first configuration.

use crate::core::config::ResolvedConfig;
use crate::core::errors::QueryError;
use crate::core::kind::Platform;
use crate::core::naming;
use crate::core::package::Package;
use crate::core::project::{Project, ProjectConfig};
use crate::core::sourcetree::{self, TreeEvent};
use crate::util::path;

/// An active (package, configuration) selection over a project.
///
/// Holds the cascade result for the pair; all accessors read from it.
#[derive(Debug)]
pub struct Scope<'p> {
    project: &'p Project,
    package_index: usize,
    config_index: usize,
    resolved: ResolvedConfig,
}

impl<'p> Scope<'p> {
    /// Select a package by index, starting at its first configuration.
    pub fn select(project: &'p Project, package_index: usize) -> Result<Self, QueryError> {
        if package_index >= project.packages.len() {
            return Err(QueryError::PackageIndexOutOfRange {
                index: package_index,
                count: project.packages.len(),
            });
        }
        Scope::at(project, package_index, 0)
    }

    /// Select a package by exact name, starting at its first configuration.
    pub fn select_by_name(project: &'p Project, name: &str) -> Result<Self, QueryError> {
        let index = project
            .package_index(name)
            .ok_or_else(|| QueryError::UnknownPackage {
                name: name.to_string(),
            })?;
        Scope::at(project, index, 0)
    }

    /// Re-select a different configuration of the same package.
    pub fn with_config(&self, config_index: usize) -> Result<Scope<'p>, QueryError> {
        Scope::at(self.project, self.package_index, config_index)
    }

    fn at(
        project: &'p Project,
        package_index: usize,
        config_index: usize,
    ) -> Result<Self, QueryError> {
        let count = project.configs.len().min(project.packages[package_index].configs.len());
        if config_index >= count {
            return Err(QueryError::ConfigIndexOutOfRange {
                index: config_index,
                count,
            });
        }
        Ok(Scope {
            project,
            package_index,
            config_index,
            resolved: ResolvedConfig::resolve(project, package_index, config_index),
        })
    }

    /// The project this scope reads from.
    pub fn project(&self) -> &'p Project {
        self.project
    }

    /// The selected package.
    pub fn package(&self) -> &'p Package {
        &self.project.packages[self.package_index]
    }

    /// The selected package's index.
    pub fn package_index(&self) -> usize {
        self.package_index
    }

    /// The selected configuration's index.
    pub fn config_index(&self) -> usize {
        self.config_index
    }

    /// The project-level configuration backing the selection.
    pub fn project_config(&self) -> &'p ProjectConfig {
        &self.project.configs[self.config_index]
    }

    /// The cascade result for the selected pair.
    pub fn config(&self) -> &ResolvedConfig {
        &self.resolved
    }

    /// Effective build flags.
    pub fn build_flags(&self) -> &[String] {
        &self.resolved.build_flags
    }

    /// Effective raw compiler options.
    pub fn build_options(&self) -> &[String] {
        &self.resolved.build_options
    }

    /// Effective preprocessor defines.
    pub fn defines(&self) -> &[String] {
        &self.resolved.defines
    }

    /// Effective include search paths.
    pub fn include_paths(&self) -> &[String] {
        &self.resolved.include_paths
    }

    /// Effective library search paths.
    pub fn library_paths(&self) -> &[String] {
        &self.resolved.library_paths
    }

    /// Effective raw linker options.
    pub fn link_options(&self) -> &[String] {
        &self.resolved.link_options
    }

    /// Effective linked library and sibling package names.
    pub fn links(&self) -> &[String] {
        &self.resolved.links
    }

    /// Effective binaries directory, relative to the project root.
    pub fn bin_dir(&self) -> &str {
        &self.resolved.bin_dir
    }

    /// Effective libraries directory, relative to the project root.
    pub fn lib_dir(&self) -> &str {
        &self.resolved.lib_dir
    }

    /// Effective intermediates directory, relative to the package.
    pub fn obj_dir(&self) -> &str {
        &self.resolved.obj_dir
    }

    /// The directory the target file lands in: the libraries directory for
    /// static libraries, the binaries directory for everything else.
    pub fn out_dir(&self) -> &str {
        use crate::core::kind::TargetKind;
        match self.package().kind {
            TargetKind::StaticLib => self.lib_dir(),
            _ => self.bin_dir(),
        }
    }

    /// The concrete output filename for the selection on a platform.
    pub fn target_name(&self, platform: Platform) -> String {
        let package = self.package();
        naming::target_file(package.kind, package.language, platform, &self.resolved)
    }

    /// A project-root-relative directory as seen from the package directory.
    ///
    /// Generated scripts run inside the package directory, so every output
    /// location has to be re-rooted this way before it is emitted.
    pub fn dir_from_package(&self, dir: &str) -> String {
        let from = path::absolute("/", &self.package().path);
        let to = path::absolute("/", dir);
        path::relative(&from, &to, false)
    }

    /// The output directory as seen from the package directory.
    pub fn out_dir_from_package(&self) -> String {
        self.dir_from_package(self.out_dir())
    }

    /// First member file with the given extension, if any.
    pub fn find_file_with_extension(&self, ext: &str) -> Option<&'p str> {
        self.package().find_file_with_extension(ext)
    }

    /// Walk the package's files in nested, directory-grouped order.
    pub fn walk_sources<F>(&self, visit: F)
    where
        F: FnMut(TreeEvent<'_>),
    {
        sourcetree::walk_sources(&self.package().files, visit);
    }

    /// Linked names that resolve to sibling packages, by exact name match.
    ///
    /// No language filtering happens here; whether a sibling of another
    /// language counts as a link target is backend policy.
    pub fn sibling_packages(&self) -> Vec<&'p Package> {
        self.resolved
            .links
            .iter()
            .filter_map(|name| self.project.package(name))
            .collect()
    }

    /// Linked names that did not match any sibling package.
    pub fn system_links(&self) -> Vec<&str> {
        self.resolved
            .links
            .iter()
            .filter(|name| self.project.package_index(name).is_none())
            .map(String::as_str)
            .collect()
    }
}

//! Build settings and the cascade that resolves them.
//!
//! Settings appear at two scopes: once on the package itself and once per
//! build configuration. The effective value for a (package, configuration)
//! pair is computed here: lists concatenate (package entries first, order
//! preserved, duplicates kept for the emitters to handle), scalars fall
//! through config -> package -> project default, first defined tier wins.

use serde::{Deserialize, Serialize};

use crate::core::project::Project;

/// Build flag: emit position-independent dynamic libraries on macOS
/// (`.dylib` instead of the `lib*.so` convention).
pub const FLAG_DYLIB: &str = "dylib";

/// Build flag: strip debug symbols.
pub const FLAG_NO_SYMBOLS: &str = "no-symbols";

/// Build flag: optimize for speed.
pub const FLAG_OPTIMIZE: &str = "optimize";

/// Build flag: optimize for size.
pub const FLAG_OPTIMIZE_SIZE: &str = "optimize-size";

/// Intermediates directory used when neither scope sets one.
pub const DEFAULT_OBJ_DIR: &str = "obj";

/// Settings that can be given at package scope or per configuration.
///
/// List values cascade by concatenation; scalar values by fallback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SettingsBlock {
    /// Abstract build flags (e.g. `optimize`, `no-symbols`, `dylib`)
    #[serde(default)]
    pub build_flags: Vec<String>,

    /// Raw compiler options passed through untouched
    #[serde(default)]
    pub build_options: Vec<String>,

    /// Preprocessor defines
    #[serde(default)]
    pub defines: Vec<String>,

    /// Include search paths, relative to the package
    #[serde(default)]
    pub include_paths: Vec<String>,

    /// Library search paths, relative to the package
    #[serde(default)]
    pub library_paths: Vec<String>,

    /// Raw linker options passed through untouched
    #[serde(default)]
    pub link_options: Vec<String>,

    /// Libraries to link: sibling package names or system libraries
    #[serde(default)]
    pub links: Vec<String>,

    /// Target base-name override
    #[serde(default)]
    pub target: Option<String>,

    /// Target file-name prefix override (replaces e.g. the `lib` default)
    #[serde(default)]
    pub prefix: Option<String>,

    /// Target extension override (replaces the platform default)
    #[serde(default, rename = "target-extension")]
    pub extension: Option<String>,

    /// Binaries directory override
    #[serde(default, rename = "bindir")]
    pub bin_dir: Option<String>,

    /// Libraries directory override
    #[serde(default, rename = "libdir")]
    pub lib_dir: Option<String>,

    /// Intermediates directory override
    #[serde(default, rename = "objdir")]
    pub obj_dir: Option<String>,
}

impl SettingsBlock {
    /// Check whether every field is unset.
    pub fn is_empty(&self) -> bool {
        self.build_flags.is_empty()
            && self.build_options.is_empty()
            && self.defines.is_empty()
            && self.include_paths.is_empty()
            && self.library_paths.is_empty()
            && self.link_options.is_empty()
            && self.links.is_empty()
            && self.target.is_none()
            && self.prefix.is_none()
            && self.extension.is_none()
            && self.bin_dir.is_none()
            && self.lib_dir.is_none()
            && self.obj_dir.is_none()
    }
}

/// One build configuration of a package, index-aligned with the project's
/// configuration list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigBlock {
    /// Configuration name, matching a project configuration
    pub name: String,

    /// Configuration-scope settings
    #[serde(flatten)]
    pub settings: SettingsBlock,
}

impl ConfigBlock {
    /// Create an empty configuration block.
    pub fn new(name: impl Into<String>) -> Self {
        ConfigBlock {
            name: name.into(),
            settings: SettingsBlock::default(),
        }
    }
}

/// The effective settings for one (package, configuration) pair.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// Configuration name
    pub name: String,

    /// Target base name (defaults to the package name)
    pub target: String,

    /// Target prefix override, if any scope set one
    pub prefix: Option<String>,

    /// Target extension override, if any scope set one
    pub extension: Option<String>,

    /// Effective binaries directory
    pub bin_dir: String,

    /// Effective libraries directory
    pub lib_dir: String,

    /// Effective intermediates directory
    pub obj_dir: String,

    /// Effective build flags
    pub build_flags: Vec<String>,

    /// Effective raw compiler options
    pub build_options: Vec<String>,

    /// Effective preprocessor defines
    pub defines: Vec<String>,

    /// Effective include search paths
    pub include_paths: Vec<String>,

    /// Effective library search paths
    pub library_paths: Vec<String>,

    /// Effective raw linker options
    pub link_options: Vec<String>,

    /// Effective linked libraries and sibling packages
    pub links: Vec<String>,
}

impl ResolvedConfig {
    /// Run the cascade for one (package, configuration) pair.
    ///
    /// `config_index` must already be validated against the package; the
    /// cascade itself cannot fail.
    pub fn resolve(project: &Project, package_index: usize, config_index: usize) -> ResolvedConfig {
        let package = &project.packages[package_index];
        let project_config = &project.configs[config_index];
        let pkg = &package.settings;
        let cfg = &package.configs[config_index].settings;

        ResolvedConfig {
            name: package.configs[config_index].name.clone(),
            target: scalar(&cfg.target, &pkg.target)
                .unwrap_or(&package.name)
                .to_string(),
            prefix: scalar(&cfg.prefix, &pkg.prefix).cloned(),
            extension: scalar(&cfg.extension, &pkg.extension).cloned(),
            bin_dir: scalar(&cfg.bin_dir, &pkg.bin_dir)
                .unwrap_or(&project_config.bin_dir)
                .to_string(),
            lib_dir: scalar(&cfg.lib_dir, &pkg.lib_dir)
                .unwrap_or(&project_config.lib_dir)
                .to_string(),
            obj_dir: scalar(&cfg.obj_dir, &pkg.obj_dir)
                .map(String::as_str)
                .unwrap_or(DEFAULT_OBJ_DIR)
                .to_string(),
            build_flags: concat(&pkg.build_flags, &cfg.build_flags),
            build_options: concat(&pkg.build_options, &cfg.build_options),
            defines: concat(&pkg.defines, &cfg.defines),
            include_paths: concat(&pkg.include_paths, &cfg.include_paths),
            library_paths: concat(&pkg.library_paths, &cfg.library_paths),
            link_options: concat(&pkg.link_options, &cfg.link_options),
            links: concat(&pkg.links, &cfg.links),
        }
    }

    /// Check whether a build flag is set for this pair.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.build_flags.iter().any(|f| f == flag)
    }
}

/// Scalar fallback: config tier wins over package tier; the project tier is
/// supplied by the caller via `unwrap_or`.
fn scalar<'a, T>(config: &'a Option<T>, package: &'a Option<T>) -> Option<&'a T> {
    config.as_ref().or(package.as_ref())
}

/// List cascade: package entries first, order preserved, duplicates kept.
fn concat(package: &[String], config: &[String]) -> Vec<String> {
    package.iter().chain(config.iter()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::package::Package;
    use crate::core::project::{Project, ProjectConfig};

    fn fixture() -> Project {
        let mut project = Project::new("Test", ".");
        project.configs = vec![
            ProjectConfig::new("DEBUG").with_bin_dir("bin").with_lib_dir("bin"),
            ProjectConfig::new("RELEASE").with_bin_dir("bin").with_lib_dir("bin"),
        ];

        let mut package = Package::new("mypkg", ".");
        package.settings.defines = vec!["PKG".to_string()];
        package.configs = vec![
            ConfigBlock {
                name: "DEBUG".to_string(),
                settings: SettingsBlock {
                    defines: vec!["DEBUG".to_string()],
                    ..SettingsBlock::default()
                },
            },
            ConfigBlock::new("RELEASE"),
        ];
        project.packages.push(package);
        project
    }

    #[test]
    fn test_list_cascade_order() {
        let project = fixture();
        let resolved = ResolvedConfig::resolve(&project, 0, 0);
        assert_eq!(resolved.defines, vec!["PKG", "DEBUG"]);
    }

    #[test]
    fn test_list_cascade_keeps_duplicates() {
        let mut project = fixture();
        project.packages[0].configs[0]
            .settings
            .defines
            .push("PKG".to_string());
        let resolved = ResolvedConfig::resolve(&project, 0, 0);
        assert_eq!(resolved.defines, vec!["PKG", "DEBUG", "PKG"]);
    }

    #[test]
    fn test_scalar_fallback_to_project() {
        let project = fixture();
        let resolved = ResolvedConfig::resolve(&project, 0, 0);
        assert_eq!(resolved.bin_dir, "bin");
    }

    #[test]
    fn test_scalar_package_tier_wins_over_project() {
        let mut project = fixture();
        project.packages[0].settings.bin_dir = Some("out".to_string());
        let resolved = ResolvedConfig::resolve(&project, 0, 0);
        assert_eq!(resolved.bin_dir, "out");
    }

    #[test]
    fn test_scalar_config_tier_wins_outright() {
        let mut project = fixture();
        project.packages[0].settings.bin_dir = Some("out".to_string());
        project.packages[0].configs[0].settings.bin_dir = Some("dbg".to_string());
        let resolved = ResolvedConfig::resolve(&project, 0, 0);
        assert_eq!(resolved.bin_dir, "dbg");
        // The other configuration still sees the package tier.
        let release = ResolvedConfig::resolve(&project, 0, 1);
        assert_eq!(release.bin_dir, "out");
    }

    #[test]
    fn test_target_defaults_to_package_name() {
        let project = fixture();
        let resolved = ResolvedConfig::resolve(&project, 0, 0);
        assert_eq!(resolved.target, "mypkg");
        assert_eq!(resolved.obj_dir, DEFAULT_OBJ_DIR);
    }

    #[test]
    fn test_has_flag() {
        let mut project = fixture();
        project.packages[0].settings.build_flags = vec![FLAG_DYLIB.to_string()];
        let resolved = ResolvedConfig::resolve(&project, 0, 0);
        assert!(resolved.has_flag(FLAG_DYLIB));
        assert!(!resolved.has_flag(FLAG_OPTIMIZE));
    }
}

//! The normalized project description and the builder pass that walks it
//! into the typed configuration model.
//!
//! The description is an immutable tagged tree with fixed keys, carried by
//! serde; `Slipway.toml` is its on-disk form. How the tree gets authored
//! is not this crate's concern. `build_project` walks the tree exactly
//! once; resolution never reaches back into the raw structure.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::core::config::{
    ConfigBlock, SettingsBlock, FLAG_NO_SYMBOLS, FLAG_OPTIMIZE,
};
use crate::core::errors::ModelError;
use crate::core::kind::{Language, TargetKind};
use crate::core::package::{FileConfig, Package};
use crate::core::project::{Project, ProjectConfig, ProjectOption};
use crate::util::path;

/// The root of the normalized project description.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectSpec {
    /// Project name
    pub name: String,

    /// Root path for generated scripts (defaults to the manifest directory)
    #[serde(default)]
    pub path: Option<String>,

    /// Project-wide default binaries directory
    #[serde(default, rename = "bindir")]
    pub bin_dir: Option<String>,

    /// Project-wide default libraries directory
    #[serde(default, rename = "libdir")]
    pub lib_dir: Option<String>,

    /// Build configurations; Debug and Release when omitted
    #[serde(default)]
    pub configs: Vec<ProjectConfigSpec>,

    /// User-visible option flags
    #[serde(default)]
    pub options: Vec<OptionSpec>,

    /// Packages
    #[serde(default)]
    pub packages: Vec<PackageSpec>,
}

/// A project configuration: either just a name or a name with output dirs.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProjectConfigSpec {
    /// `configs = ["Debug", "Release"]`
    Name(String),
    /// `[[configs]]` with explicit directories
    Full {
        name: String,
        #[serde(default, rename = "bindir")]
        bin_dir: Option<String>,
        #[serde(default, rename = "libdir")]
        lib_dir: Option<String>,
    },
}

/// A user-visible option flag.
#[derive(Debug, Deserialize)]
pub struct OptionSpec {
    pub flag: String,
    pub description: String,
}

/// One package description.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PackageSpec {
    /// Package name, unique within the project
    pub name: String,

    /// Path relative to the project root (defaults to the name)
    #[serde(default)]
    pub path: Option<String>,

    /// Source language (defaults to c++)
    #[serde(default)]
    pub language: Option<String>,

    /// Target kind (defaults to a console executable)
    #[serde(default)]
    pub kind: Option<String>,

    /// Deployment URL
    #[serde(default)]
    pub url: Option<String>,

    /// Member source files; entries may be glob patterns, expanded by the
    /// loader before the builder pass runs
    #[serde(default)]
    pub files: Vec<String>,

    /// Per-file settings, keyed by file path
    #[serde(default)]
    pub file_configs: BTreeMap<String, FileConfig>,

    /// Package-scope settings
    #[serde(flatten)]
    pub settings: SettingsBlock,

    /// Per-configuration settings blocks, matched to project configs by name
    #[serde(default)]
    pub config: Vec<ConfigBlock>,
}

/// Parse a project description from TOML text.
pub fn from_toml_str(text: &str) -> Result<ProjectSpec, toml::de::Error> {
    toml::from_str(text)
}

/// Walk a project description into the typed configuration model.
///
/// Single pass: configurations first, then each package with its blocks
/// aligned by name against the project configurations (gaps become empty
/// blocks, unknown names are fatal). The finished model is re-validated
/// before it is returned.
pub fn build_project(spec: ProjectSpec) -> Result<Project, ModelError> {
    let mut project = Project::new(&spec.name, spec.path.as_deref().unwrap_or("."));

    if project.name.contains(' ') {
        tracing::warn!("not all generators allow spaces in the project name");
    }

    let default_bin = spec.bin_dir.as_deref().unwrap_or(".");
    let default_lib = spec.lib_dir.as_deref().unwrap_or(".");

    let config_specs = if spec.configs.is_empty() {
        vec![
            ProjectConfigSpec::Name("Debug".to_string()),
            ProjectConfigSpec::Name("Release".to_string()),
        ]
    } else {
        spec.configs
    };

    for config in config_specs {
        let (name, bin_dir, lib_dir) = match config {
            ProjectConfigSpec::Name(name) => (name, None, None),
            ProjectConfigSpec::Full {
                name,
                bin_dir,
                lib_dir,
            } => (name, bin_dir, lib_dir),
        };
        project.configs.push(
            ProjectConfig::new(name)
                .with_bin_dir(bin_dir.as_deref().unwrap_or(default_bin))
                .with_lib_dir(lib_dir.as_deref().unwrap_or(default_lib)),
        );
    }

    for option in spec.options {
        project.options.push(ProjectOption {
            flag: option.flag,
            description: option.description,
        });
    }

    for pkg_spec in spec.packages {
        project.packages.push(build_package(&project, pkg_spec)?);
    }

    project.validate()?;
    Ok(project)
}

fn build_package(project: &Project, spec: PackageSpec) -> Result<Package, ModelError> {
    let invalid = |message: String| ModelError::InvalidPackage {
        package: spec.name.clone(),
        message,
    };

    let language = match spec.language.as_deref() {
        Some(s) => s.parse::<Language>().map_err(|e| invalid(e.to_string()))?,
        None => Language::default(),
    };
    let kind = match spec.kind.as_deref() {
        Some(s) => s.parse::<TargetKind>().map_err(|e| invalid(e.to_string()))?,
        None => TargetKind::default(),
    };

    let pkg_path = spec.path.clone().unwrap_or_else(|| spec.name.clone());
    let mut package = Package::new(&spec.name, pkg_path)
        .with_language(language)
        .with_kind(kind)
        .with_files(spec.files);
    package.url = spec.url;
    package.settings = spec.settings;

    for (file, file_config) in spec.file_configs {
        let file = path::neutral(&file);
        match package.files.iter().position(|f| *f == file) {
            Some(i) => package.file_configs[i] = file_config,
            None => {
                return Err(invalid(format!(
                    "file config for `{}` matches no member file",
                    file
                )))
            }
        }
    }

    let mut blocks = spec.config;
    for project_config in &project.configs {
        let block = match blocks.iter().position(|b| b.name == project_config.name) {
            Some(i) => blocks.remove(i),
            None => ConfigBlock::new(&project_config.name),
        };
        package.configs.push(seed_defaults(block));
    }

    // Anything left over names a configuration the project never declared.
    if let Some(block) = blocks.into_iter().next() {
        return Err(ModelError::UnknownConfig {
            package: spec.name,
            name: block.name,
        });
    }

    Ok(package)
}

/// Release configurations with no explicit flags get the conventional
/// optimized, symbol-stripped defaults.
fn seed_defaults(mut block: ConfigBlock) -> ConfigBlock {
    if block.name == "Release" && block.settings.build_flags.is_empty() {
        block.settings.build_flags =
            vec![FLAG_NO_SYMBOLS.to_string(), FLAG_OPTIMIZE.to_string()];
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
name = "Demo"
bindir = "bin"

configs = ["Debug", "Release"]

[[options]]
flag = "with-tests"
description = "Also generate the test runner"

[[packages]]
name = "engine"
path = "engine"
language = "c++"
kind = "lib"
files = ["src/core.cpp", "src/core.h"]
defines = ["ENGINE"]

[[packages.config]]
name = "Debug"
defines = ["DEBUG"]

[[packages]]
name = "game"
language = "c++"
kind = "exe"
files = ["main.cpp"]
links = ["engine"]
"#;

    #[test]
    fn test_full_round_trip() {
        let spec = from_toml_str(MANIFEST).unwrap();
        let project = build_project(spec).unwrap();

        assert_eq!(project.name, "Demo");
        assert_eq!(project.configs.len(), 2);
        assert_eq!(project.configs[0].bin_dir, "bin");
        assert_eq!(project.options.len(), 1);
        assert_eq!(project.packages.len(), 2);

        let engine = project.package("engine").unwrap();
        assert_eq!(engine.kind, TargetKind::StaticLib);
        assert_eq!(engine.configs.len(), 2);
        assert_eq!(engine.configs[0].settings.defines, vec!["DEBUG"]);
        // The missing Release block was filled in, with default flags.
        assert_eq!(
            engine.configs[1].settings.build_flags,
            vec![FLAG_NO_SYMBOLS, FLAG_OPTIMIZE]
        );

        // Package path defaults to the package name.
        assert_eq!(project.package("game").unwrap().path, "game");
    }

    #[test]
    fn test_default_configs_when_omitted() {
        let spec = from_toml_str("name = \"Tiny\"").unwrap();
        let project = build_project(spec).unwrap();
        let names: Vec<&str> = project.configs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Debug", "Release"]);
    }

    #[test]
    fn test_unknown_kind_names_value() {
        let spec = from_toml_str(
            r#"
name = "Demo"
[[packages]]
name = "p"
kind = "plugin"
"#,
        )
        .unwrap();
        let err = build_project(spec).unwrap_err();
        assert!(err.to_string().contains("plugin"));
    }

    #[test]
    fn test_unknown_config_block_is_fatal() {
        let spec = from_toml_str(
            r#"
name = "Demo"
configs = ["Debug"]
[[packages]]
name = "p"
[[packages.config]]
name = "Retail"
"#,
        )
        .unwrap();
        assert!(matches!(
            build_project(spec).unwrap_err(),
            ModelError::UnknownConfig { .. }
        ));
    }

    #[test]
    fn test_duplicate_package_is_fatal() {
        let spec = from_toml_str(
            r#"
name = "Demo"
[[packages]]
name = "p"
[[packages]]
name = "p"
"#,
        )
        .unwrap();
        assert!(matches!(
            build_project(spec).unwrap_err(),
            ModelError::DuplicatePackageName { .. }
        ));
    }

    #[test]
    fn test_file_config_alignment() {
        let spec = from_toml_str(
            r#"
name = "Demo"
[[packages]]
name = "ui"
language = "c#"
kind = "winexe"
files = ["Main.cs", "logo.png"]
[packages.file-configs."logo.png"]
build-action = "EmbeddedResource"
"#,
        )
        .unwrap();
        let project = build_project(spec).unwrap();
        let ui = project.package("ui").unwrap();
        assert_eq!(
            ui.file_config("logo.png").unwrap().build_action.as_deref(),
            Some("EmbeddedResource")
        );
    }

    #[test]
    fn test_file_config_for_missing_file() {
        let spec = from_toml_str(
            r#"
name = "Demo"
[[packages]]
name = "ui"
files = ["Main.cs"]
[packages.file-configs."Typo.cs"]
build-action = "Compile"
"#,
        )
        .unwrap();
        assert!(build_project(spec).is_err());
    }
}

//! The generate operation: project description in, build scripts out.
//!
//! This is the loader side of the core's boundary. It reads the manifest,
//! expands file globs, runs the builder pass, and drives the selected
//! backend over the resolved model. Nothing is written until the model has
//! validated.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde_json::json;

use crate::backend::{Backend, BackendOptions, BackendRegistry};
use crate::core::kind::Platform;
use crate::core::project::Project;
use crate::core::query::Scope;
use crate::core::schema::{self, ProjectSpec};
use crate::util::diagnostic::suggestions;
use crate::util::{fs, path};

/// The manifest file name.
pub const MANIFEST_NAME: &str = "Slipway.toml";

/// Options for the generate operation.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Backend format name
    pub target: String,

    /// Platform override; the host platform when absent
    pub os: Option<String>,

    /// Compiler family for makefile outputs
    pub cc: String,

    /// Print the resolved model as JSON instead of writing scripts
    pub dump: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            target: "gnu".to_string(),
            os: None,
            cc: "gcc".to_string(),
            dump: false,
        }
    }
}

/// Locate the manifest in (or above) a directory.
pub fn find_manifest(dir: &Path) -> Result<PathBuf> {
    let mut current = Some(dir);
    while let Some(dir) = current {
        let candidate = dir.join(MANIFEST_NAME);
        if candidate.is_file() {
            return Ok(candidate);
        }
        current = dir.parent();
    }
    Err(anyhow!(
        "no {} found in `{}` or any parent directory\n{}",
        MANIFEST_NAME,
        dir.display(),
        suggestions::NO_MANIFEST
    ))
}

/// Load and build the configuration model from a manifest file.
pub fn load_project(manifest_path: &Path) -> Result<Project> {
    let text = fs::read_to_string(manifest_path)?;
    let mut spec = schema::from_toml_str(&text)
        .with_context(|| format!("failed to parse {}", manifest_path.display()))?;

    let manifest_dir = manifest_path.parent().unwrap_or(Path::new("."));
    if spec.path.is_none() {
        spec.path = Some(manifest_dir.to_string_lossy().into_owned());
    }

    expand_globs(&mut spec, manifest_dir)?;

    let project = schema::build_project(spec).map_err(|e| {
        crate::util::diagnostic::emit(&e.to_diagnostic(), false);
        anyhow!(e).context("invalid project description")
    })?;

    tracing::debug!(
        packages = project.packages.len(),
        configs = project.configs.len(),
        "loaded project model"
    );
    Ok(project)
}

/// Expand glob patterns in each package's file list.
///
/// Patterns are matched relative to the package directory; the expanded
/// entries are package-relative with neutral separators, in sorted order.
/// Literal entries pass through untouched whether or not they exist.
fn expand_globs(spec: &mut ProjectSpec, root: &Path) -> Result<()> {
    for package in &mut spec.packages {
        let pkg_dir = root.join(
            package
                .path
                .clone()
                .unwrap_or_else(|| package.name.clone()),
        );

        let mut expanded = Vec::new();
        for entry in &package.files {
            if !entry.contains(&['*', '?', '['][..]) {
                expanded.push(entry.clone());
                continue;
            }

            let pattern = pkg_dir.join(entry);
            let pattern = pattern.to_string_lossy();
            let mut matches = Vec::new();
            for hit in glob::glob(&pattern)
                .with_context(|| format!("invalid file pattern `{}`", entry))?
            {
                let hit = hit.with_context(|| format!("failed reading matches for `{}`", entry))?;
                if !hit.is_file() {
                    continue;
                }
                let relative = hit.strip_prefix(&pkg_dir).unwrap_or(&hit);
                matches.push(path::neutral(&relative.to_string_lossy()));
            }
            matches.sort();
            expanded.extend(matches);
        }
        package.files = expanded;
    }
    Ok(())
}

/// Run the full generation: load, resolve, render, write.
pub fn generate(dir: &Path, options: &GenerateOptions) -> Result<()> {
    let manifest = find_manifest(dir)?;
    let project = load_project(&manifest)?;

    let platform = match options.os.as_deref() {
        Some(os) => os
            .parse::<Platform>()
            .map_err(|e| anyhow!(e.to_string()))?,
        None => Platform::host(),
    };

    let registry = BackendRegistry::new(BackendOptions {
        platform,
        cc: options.cc.clone(),
    });
    let backend = registry.get(&options.target).ok_or_else(|| {
        anyhow!(
            "unknown target format `{}` (known: {})\n{}",
            options.target,
            registry.names().join(", "),
            suggestions::UNKNOWN_TARGET
        )
    })?;

    backend.assign_identities(&project)?;

    if options.dump {
        println!("{}", dump_model(&project, platform)?);
        return Ok(());
    }

    println!("Generating {} scripts:", backend.name());
    write_scripts(backend, &project)?;
    Ok(())
}

fn write_scripts(backend: &dyn Backend, project: &Project) -> Result<()> {
    let root = PathBuf::from(&project.path);

    let aggregate = backend.render_aggregate(project)?;
    let aggregate_path = root.join(backend.aggregate_script(project));
    fs::write_string(&aggregate_path, &aggregate)?;
    println!("  {}", backend.aggregate_script(project));

    for index in 0..project.packages.len() {
        let script = backend.target_script(project, index);
        let text = backend.render_target(project, index)?;
        fs::write_string(&root.join(&script), &text)?;
        println!("  {}", script);
    }
    Ok(())
}

/// Render the resolved model as JSON, one entry per (package, config).
pub fn dump_model(project: &Project, platform: Platform) -> Result<String> {
    let mut packages = Vec::new();
    for index in 0..project.packages.len() {
        let scope = Scope::select(project, index)?;
        let package = scope.package();

        let mut configs = Vec::new();
        for config_index in 0..project.configs.len() {
            let scope = scope.with_config(config_index)?;
            let config = scope.config();
            configs.push(json!({
                "name": config.name,
                "target": scope.target_name(platform),
                "bindir": scope.bin_dir(),
                "libdir": scope.lib_dir(),
                "objdir": scope.obj_dir(),
                "build-flags": config.build_flags,
                "build-options": config.build_options,
                "defines": config.defines,
                "include-paths": config.include_paths,
                "library-paths": config.library_paths,
                "link-options": config.link_options,
                "links": config.links,
            }));
        }

        packages.push(json!({
            "name": package.name,
            "path": package.path,
            "language": package.language.as_str(),
            "kind": package.kind.as_str(),
            "files": package.files,
            "configs": configs,
        }));
    }

    let model = json!({
        "name": project.name,
        "path": project.path,
        "platform": platform.as_str(),
        "options": project.options.iter().map(|o| json!({
            "flag": o.flag,
            "description": o.description,
        })).collect::<Vec<_>>(),
        "packages": packages,
    });

    Ok(serde_json::to_string_pretty(&model)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;
    use tempfile::TempDir;

    fn write_manifest(dir: &Path, text: &str) {
        stdfs::write(dir.join(MANIFEST_NAME), text).unwrap();
    }

    const MANIFEST: &str = r#"
name = "Demo"
bindir = "bin"

[[packages]]
name = "game"
language = "c"
kind = "exe"
files = ["src/*.c"]
"#;

    #[test]
    fn test_find_manifest_walks_up() {
        let tmp = TempDir::new().unwrap();
        write_manifest(tmp.path(), MANIFEST);
        let nested = tmp.path().join("game/src");
        stdfs::create_dir_all(&nested).unwrap();

        let found = find_manifest(&nested).unwrap();
        assert_eq!(found, tmp.path().join(MANIFEST_NAME));
    }

    #[test]
    fn test_missing_manifest_is_actionable() {
        let tmp = TempDir::new().unwrap();
        let err = find_manifest(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("Slipway.toml"));
    }

    #[test]
    fn test_glob_expansion() {
        let tmp = TempDir::new().unwrap();
        write_manifest(tmp.path(), MANIFEST);
        let src = tmp.path().join("game/src");
        stdfs::create_dir_all(&src).unwrap();
        stdfs::write(src.join("main.c"), "int main() {}").unwrap();
        stdfs::write(src.join("util.c"), "").unwrap();
        stdfs::write(src.join("notes.txt"), "").unwrap();

        let project = load_project(&tmp.path().join(MANIFEST_NAME)).unwrap();
        assert_eq!(
            project.packages[0].files,
            vec!["src/main.c", "src/util.c"]
        );
    }

    #[test]
    fn test_generate_writes_scripts() {
        let tmp = TempDir::new().unwrap();
        write_manifest(tmp.path(), MANIFEST);
        let src = tmp.path().join("game/src");
        stdfs::create_dir_all(&src).unwrap();
        stdfs::write(src.join("main.c"), "int main() {}").unwrap();

        let options = GenerateOptions {
            os: Some("linux".to_string()),
            ..GenerateOptions::default()
        };
        generate(tmp.path(), &options).unwrap();

        assert!(tmp.path().join("Makefile").is_file());
        let pkg_makefile = tmp.path().join("game/Makefile");
        assert!(pkg_makefile.is_file());
        let text = stdfs::read_to_string(pkg_makefile).unwrap();
        assert!(text.contains("TARGET := game"));
    }

    #[test]
    fn test_unknown_target_is_reported() {
        let tmp = TempDir::new().unwrap();
        write_manifest(tmp.path(), MANIFEST);

        let options = GenerateOptions {
            target: "xcode".to_string(),
            ..GenerateOptions::default()
        };
        let err = generate(tmp.path(), &options).unwrap_err();
        assert!(err.to_string().contains("xcode"));
        assert!(err.to_string().contains("gnu"));
    }

    #[test]
    fn test_dump_model_is_valid_json() {
        let tmp = TempDir::new().unwrap();
        write_manifest(tmp.path(), MANIFEST);
        let project = load_project(&tmp.path().join(MANIFEST_NAME)).unwrap();

        let dump = dump_model(&project, Platform::Posix).unwrap();
        let value: serde_json::Value = serde_json::from_str(&dump).unwrap();
        assert_eq!(value["name"], "Demo");
        assert_eq!(value["packages"][0]["configs"][0]["target"], "game");
    }
}

//! The clean operation: remove everything generation may have written.
//!
//! Scripts for every registered backend are removed, along with computed
//! target files and intermediate directories for every package and
//! configuration, on every platform's naming convention. Missing files
//! are skipped silently; a clean tree is not an error.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::backend::{Backend, BackendRegistry};
use crate::core::kind::Platform;
use crate::core::project::Project;
use crate::core::query::Scope;
use crate::util::{fs, path};

/// Remove generated build scripts and computed build outputs.
pub fn clean(dir: &Path) -> Result<()> {
    let manifest = crate::ops::generate::find_manifest(dir)?;
    let project = crate::ops::generate::load_project(&manifest)?;

    println!("Removing all generated and output files...");

    let root = PathBuf::from(&project.path);
    let registry = BackendRegistry::default();

    // Scripts, for every backend that could have produced them.
    for backend in registry.all() {
        remove(&root, &backend.aggregate_script(&project))?;
        for index in 0..project.packages.len() {
            remove(&root, &backend.target_script(&project, index))?;
        }
    }

    // Target files under each configuration's output directory. The
    // platform is not recorded in the manifest, so every platform's
    // spelling of the target is a removal candidate.
    for index in 0..project.packages.len() {
        let scope = Scope::select(&project, index)?;

        for config_index in 0..project.configs.len() {
            let scope = scope.with_config(config_index)?;

            for platform in [Platform::Windows, Platform::MacOsx, Platform::Posix] {
                let target = scope.target_name(platform);
                remove(&root, &path::join(scope.out_dir(), &target, ""))?;

                // Bundles leave a directory tree behind.
                if let Some(bundle) = target.split(".app/").next() {
                    if target.contains(".app/") {
                        let app = format!("{}.app", bundle);
                        fs::remove_dir_all_if_exists(
                            &root.join(path::join(scope.out_dir(), &app, "")),
                        )?;
                    }
                }
            }

            let obj_dir = path::join(&scope.package().path, scope.obj_dir(), "");
            fs::remove_dir_all_if_exists(&root.join(obj_dir))?;
        }
    }

    Ok(())
}

fn remove(root: &Path, relative: &str) -> Result<()> {
    let target = root.join(relative);
    if fs::remove_file_if_exists(&target)? {
        tracing::debug!(path = %target.display(), "removed");
    }
    Ok(())
}

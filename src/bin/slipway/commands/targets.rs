//! `slipway targets` command
//!
//! Lists the supported build-file formats, and the packages of the local
//! project when a manifest is present.

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::TargetsArgs;
use slipway::ops::{find_manifest, load_project};
use slipway::BackendRegistry;

pub fn execute(args: TargetsArgs) -> Result<()> {
    let registry = BackendRegistry::default();
    println!("Supported formats:");
    for name in registry.names() {
        println!("  {}", name);
    }

    let dir = args.path.unwrap_or_else(|| PathBuf::from("."));
    if let Ok(manifest) = find_manifest(&dir) {
        let project = load_project(&manifest)?;
        println!();
        println!("Packages in {}:", project.name);
        for package in &project.packages {
            println!("  {} ({}, {})", package.name, package.language, package.kind);
        }
        if !project.options.is_empty() {
            println!();
            println!("Options:");
            for option in &project.options {
                println!("  --{}  {}", option.flag, option.description);
            }
        }
    }

    Ok(())
}

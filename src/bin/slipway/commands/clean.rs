//! `slipway clean` command

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::CleanArgs;
use slipway::ops::clean;

pub fn execute(args: CleanArgs) -> Result<()> {
    let dir = args.path.unwrap_or_else(|| PathBuf::from("."));
    clean(&dir)
}

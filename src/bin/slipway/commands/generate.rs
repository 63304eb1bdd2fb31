//! `slipway generate` command

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::GenerateArgs;
use slipway::ops::{generate, GenerateOptions};

pub fn execute(args: GenerateArgs) -> Result<()> {
    let dir = args.path.unwrap_or_else(|| PathBuf::from("."));

    let options = GenerateOptions {
        target: args.target,
        os: args.os,
        cc: args.cc,
        dump: args.dump,
    };

    generate(&dir, &options)
}

//! Command implementations.

pub mod assemble;
pub mod completions;
pub mod run;

use std::path::PathBuf;

use anyhow::{bail, Result};

use toolforge::core::manifest::MANIFEST_NAME;

/// Resolve the manifest path: explicit flag, or Toolforge.toml in the
/// current directory.
pub fn find_manifest(explicit: Option<PathBuf>) -> Result<PathBuf> {
    let path = match explicit {
        Some(path) => path,
        None => std::env::current_dir()?.join(MANIFEST_NAME),
    };
    if !path.is_file() {
        bail!(
            "manifest not found: {}\n\
             hint: pass --manifest or run from a directory containing {}",
            path.display(),
            MANIFEST_NAME
        );
    }
    Ok(path)
}

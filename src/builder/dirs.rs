//! Stage directory allocation.
//!
//! Each stage builds in its own directory under the build root. A
//! directory is never shared or reused across stages: a stale or
//! recycled build directory would let one stage's artifacts leak into
//! another's configure step.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::builder::errors::BootstrapError;

/// Allocates one fresh, isolated build directory per stage.
#[derive(Debug)]
pub struct StageDirectoryManager {
    build_root: PathBuf,
    allocated: HashSet<usize>,
}

impl StageDirectoryManager {
    pub fn new(build_root: impl Into<PathBuf>) -> Self {
        StageDirectoryManager {
            build_root: build_root.into(),
            allocated: HashSet::new(),
        }
    }

    pub fn build_root(&self) -> &Path {
        &self.build_root
    }

    /// Create `<build-root>/stage.<index>` and return it.
    ///
    /// The directory must not already exist, and a given index can be
    /// allocated at most once per run. Both violations fail rather than
    /// silently handing back a directory with pre-existing artifacts.
    pub fn allocate(&mut self, index: usize) -> Result<PathBuf, BootstrapError> {
        let path = self.build_root.join(format!("stage.{}", index));

        if !self.allocated.insert(index) {
            return Err(BootstrapError::DirectoryCreation {
                path,
                source: io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("stage {} directory was already allocated", index),
                ),
            });
        }

        fs::create_dir_all(&self.build_root).map_err(|source| {
            BootstrapError::DirectoryCreation {
                path: self.build_root.clone(),
                source,
            }
        })?;

        // create_dir (not create_dir_all) so an existing directory is an
        // error, not a reuse.
        fs::create_dir(&path).map_err(|source| BootstrapError::DirectoryCreation {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("allocated stage directory {}", path.display());
        Ok(path)
    }
}

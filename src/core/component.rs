//! Source components: the pre-extracted archives that make up a toolchain.

use std::path::{Path, PathBuf};

/// How a component participates in source-tree assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// The primary archive defining the build-system root.
    Root,
    /// An auxiliary archive relocated into the root tree.
    Subproject,
}

/// One pre-extracted source component.
///
/// Created once per extracted archive at assembly time. Immutable except
/// for `path`, which is updated exactly once when a subproject is
/// relocated into the root tree.
#[derive(Debug, Clone)]
pub struct SourceComponent {
    name: String,
    path: PathBuf,
    relocated: bool,
}

impl SourceComponent {
    /// Create a component for an extracted directory.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        SourceComponent {
            name: name.into(),
            path: path.into(),
            relocated: false,
        }
    }

    /// The component name, e.g. `llvm-10` or `clang-10`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current location of the extracted tree.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this component has already been moved into the root tree.
    pub fn is_relocated(&self) -> bool {
        self.relocated
    }

    /// Record the new location after a successful relocation.
    ///
    /// Callers must not relocate a component twice; assembly moves each
    /// subproject exactly once.
    pub(crate) fn mark_relocated(&mut self, new_path: PathBuf) {
        debug_assert!(!self.relocated, "component relocated twice: {}", self.name);
        self.path = new_path;
        self.relocated = true;
    }
}

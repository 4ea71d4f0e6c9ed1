//! Source-tree assembly.
//!
//! Merges the pre-extracted components into one canonical tree: the root
//! component's directory becomes the tree root, and every subproject is
//! moved to its fixed subpath inside it. The resulting path is read-only
//! for the rest of the pipeline.

use std::path::PathBuf;

use crate::builder::errors::BootstrapError;
use crate::core::component::{ComponentKind, SourceComponent};
use crate::core::layout::SourceLayout;
use crate::util::fs::move_dir;

/// Assembles extracted source components into a single source tree.
pub struct SourceAssembler<'a> {
    layout: &'a SourceLayout,
}

impl<'a> SourceAssembler<'a> {
    pub fn new(layout: &'a SourceLayout) -> Self {
        SourceAssembler { layout }
    }

    /// Relocate every subproject into the root tree and return the root.
    ///
    /// The root is identified before any filesystem mutation, so a
    /// missing root leaves every component untouched. Components whose
    /// name matches no layout rule are irrelevant to assembly and are
    /// left in place.
    pub fn assemble(
        &self,
        components: &mut [SourceComponent],
    ) -> Result<PathBuf, BootstrapError> {
        let root = components
            .iter()
            .find(|c| self.layout.classify(c.name()) == Some(ComponentKind::Root))
            .ok_or_else(|| BootstrapError::MissingRootSource {
                root_prefix: self.layout.root_prefix().to_string(),
            })?;
        let root_path = root.path().to_path_buf();

        tracing::info!("assembling source tree at {}", root_path.display());

        for component in components.iter_mut() {
            if self.layout.classify(component.name()) != Some(ComponentKind::Subproject) {
                continue;
            }

            // classify() matched a rule, so dest_for() cannot miss.
            let dest = root_path.join(self.layout.dest_for(component.name()).unwrap());
            let from = component.path().to_path_buf();

            tracing::debug!(
                "relocating {} -> {}",
                component.name(),
                dest.display()
            );

            move_dir(&from, &dest).map_err(|source| BootstrapError::Relocation {
                component: component.name().to_string(),
                from,
                to: dest.clone(),
                source,
            })?;

            component.mark_relocated(dest);
        }

        Ok(root_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::extracted_component;
    use tempfile::TempDir;

    #[test]
    fn test_assemble_relocates_subprojects() {
        let tmp = TempDir::new().unwrap();
        let layout = SourceLayout::llvm();

        let mut components = vec![
            extracted_component(tmp.path(), "llvm-10"),
            extracted_component(tmp.path(), "clang-10"),
            extracted_component(tmp.path(), "compiler-rt-10"),
        ];

        let root = SourceAssembler::new(&layout)
            .assemble(&mut components)
            .unwrap();

        assert_eq!(root, tmp.path().join("llvm-10"));

        // Subproject files exist at the mapped subpath and nowhere else.
        assert!(root.join("tools/clang/marker.txt").exists());
        assert!(root.join("projects/compiler-rt/marker.txt").exists());
        assert!(!tmp.path().join("clang-10").exists());
        assert!(!tmp.path().join("compiler-rt-10").exists());

        assert_eq!(components[1].path(), root.join("tools/clang"));
        assert!(components[1].is_relocated());
    }

    #[test]
    fn test_missing_root_mutates_nothing() {
        let tmp = TempDir::new().unwrap();
        let layout = SourceLayout::llvm();

        let mut components = vec![extracted_component(tmp.path(), "clang-10")];

        let err = SourceAssembler::new(&layout)
            .assemble(&mut components)
            .unwrap_err();

        assert!(matches!(err, BootstrapError::MissingRootSource { .. }));
        // The subproject was not moved.
        assert!(tmp.path().join("clang-10/marker.txt").exists());
        assert!(!components[0].is_relocated());
    }

    #[test]
    fn test_unknown_components_left_untouched() {
        let tmp = TempDir::new().unwrap();
        let layout = SourceLayout::llvm();

        let mut components = vec![
            extracted_component(tmp.path(), "llvm-10"),
            extracted_component(tmp.path(), "libunwind-10"),
        ];

        SourceAssembler::new(&layout)
            .assemble(&mut components)
            .unwrap();

        assert!(tmp.path().join("libunwind-10/marker.txt").exists());
        assert!(!components[1].is_relocated());
    }

    #[test]
    fn test_relocation_failure_leaves_original() {
        let tmp = TempDir::new().unwrap();
        let layout = SourceLayout::llvm();

        let mut components = vec![
            extracted_component(tmp.path(), "llvm-10"),
            extracted_component(tmp.path(), "clang-10"),
        ];

        // Occupy the destination so the rename fails.
        std::fs::create_dir_all(tmp.path().join("llvm-10/tools/clang")).unwrap();

        let err = SourceAssembler::new(&layout)
            .assemble(&mut components)
            .unwrap_err();

        assert!(matches!(err, BootstrapError::Relocation { .. }));
        assert!(tmp.path().join("clang-10/marker.txt").exists());
        assert!(!components[1].is_relocated());
    }
}

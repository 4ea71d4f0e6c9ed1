//! Toolforge.toml manifest parsing and schema.
//!
//! The manifest names the pre-extracted source components, the build
//! root where stage directories are allocated, and the project-wide
//! build options. It is input plumbing for the orchestrator, not a
//! general configuration language.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::layout::{LayoutRule, SourceLayout};
use crate::core::options::BuildOptions;

pub const MANIFEST_NAME: &str = "Toolforge.toml";

/// Parsed Toolforge.toml.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Directory under which stage directories are created.
    #[serde(rename = "build-root")]
    pub build_root: PathBuf,

    /// Project-wide build options.
    pub options: BuildOptions,

    /// Pre-extracted source components.
    #[serde(default, rename = "component")]
    pub components: Vec<ComponentEntry>,

    /// Optional layout override; defaults to the LLVM/Clang layout.
    #[serde(default)]
    pub layout: Option<LayoutConfig>,
}

/// One `[[component]]` entry.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentEntry {
    pub name: String,
    pub path: PathBuf,
}

/// Optional `[layout]` section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    /// Name prefix identifying the root component.
    pub root: String,

    /// Subproject placement rules.
    #[serde(default, rename = "subproject")]
    pub subprojects: Vec<SubprojectEntry>,
}

/// One `[[layout.subproject]]` entry.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubprojectEntry {
    pub prefix: String,
    pub dest: PathBuf,
}

impl Manifest {
    /// Load and validate a manifest from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;
        let manifest: Manifest = toml::from_str(&text)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(manifest)
    }

    /// Build the source layout, validating any override at load time.
    pub fn source_layout(&self) -> Result<SourceLayout> {
        match &self.layout {
            None => Ok(SourceLayout::llvm()),
            Some(cfg) => SourceLayout::new(
                cfg.root.clone(),
                cfg.subprojects.iter().map(|s| LayoutRule {
                    prefix: s.prefix.clone(),
                    dest: s.dest.clone(),
                }),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"
build-root = "/tmp/build"

[options]
install-prefix = "/opt/toolchain"
parallelism = 4

[[component]]
name = "llvm-10"
path = "/tmp/src/llvm-10"

[[component]]
name = "clang-10"
path = "/tmp/src/clang-10"
"#;

    #[test]
    fn test_parse_manifest() {
        let manifest: Manifest = toml::from_str(EXAMPLE).unwrap();

        assert_eq!(manifest.build_root, PathBuf::from("/tmp/build"));
        assert_eq!(manifest.options.parallelism, 4);
        assert_eq!(manifest.options.build_type, "Release");
        assert_eq!(manifest.components.len(), 2);
        assert_eq!(manifest.components[1].name, "clang-10");
    }

    #[test]
    fn test_default_layout_is_llvm() {
        let manifest: Manifest = toml::from_str(EXAMPLE).unwrap();
        let layout = manifest.source_layout().unwrap();

        assert!(layout.dest_for("clang-10").is_some());
    }

    #[test]
    fn test_layout_override() {
        let text = r#"
build-root = "/tmp/build"

[options]
install-prefix = "/opt/toolchain"

[layout]
root = "gcc"

[[layout.subproject]]
prefix = "mpfr"
dest = "deps/mpfr"
"#;
        let manifest: Manifest = toml::from_str(text).unwrap();
        let layout = manifest.source_layout().unwrap();

        assert_eq!(
            layout.dest_for("mpfr-4.2").unwrap().as_path(),
            Path::new("deps/mpfr")
        );
        assert!(layout.dest_for("clang-10").is_none());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let text = r#"
build-root = "/tmp/build"
bogus = true

[options]
install-prefix = "/opt/toolchain"
"#;
        assert!(toml::from_str::<Manifest>(text).is_err());
    }
}

//! Source layout: the mapping from component name prefixes to their
//! place in the assembled tree.
//!
//! The underlying project's build system expects subprojects at fixed
//! subpaths (a front-end under `tools/`, a runtime under `projects/`).
//! The mapping is an explicit table validated at construction, not
//! string-matching scattered through the assembler.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::core::component::ComponentKind;

/// One layout rule: components whose name starts with `prefix` land at
/// `dest` relative to the root tree.
#[derive(Debug, Clone)]
pub struct LayoutRule {
    pub prefix: String,
    pub dest: PathBuf,
}

/// The full component-to-subpath mapping for a toolchain.
#[derive(Debug, Clone)]
pub struct SourceLayout {
    root_prefix: String,
    rules: Vec<LayoutRule>,
}

impl SourceLayout {
    /// Build a layout from a root prefix and subproject rules.
    ///
    /// Fails if any subproject prefix or destination collides, or if a
    /// subproject rule shadows the root prefix.
    pub fn new(
        root_prefix: impl Into<String>,
        rules: impl IntoIterator<Item = LayoutRule>,
    ) -> Result<Self> {
        let root_prefix = root_prefix.into();
        let rules: Vec<LayoutRule> = rules.into_iter().collect();

        if root_prefix.is_empty() {
            bail!("source layout requires a non-empty root prefix");
        }

        let mut prefixes = HashSet::new();
        let mut dests = HashSet::new();
        for rule in &rules {
            if rule.prefix == root_prefix {
                bail!(
                    "subproject rule `{}` shadows the root prefix",
                    rule.prefix
                );
            }
            if !prefixes.insert(rule.prefix.as_str()) {
                bail!("duplicate layout rule for prefix `{}`", rule.prefix);
            }
            if !dests.insert(rule.dest.as_path()) {
                bail!(
                    "duplicate layout destination `{}`",
                    rule.dest.display()
                );
            }
        }

        Ok(SourceLayout { root_prefix, rules })
    }

    /// The default LLVM/Clang layout: `llvm` is the root, `clang` goes to
    /// `tools/clang`, `compiler-rt` to `projects/compiler-rt`.
    pub fn llvm() -> Self {
        // Statically valid, so the error path is unreachable.
        SourceLayout::new(
            "llvm",
            [
                LayoutRule {
                    prefix: "clang".to_string(),
                    dest: PathBuf::from("tools/clang"),
                },
                LayoutRule {
                    prefix: "compiler-rt".to_string(),
                    dest: PathBuf::from("projects/compiler-rt"),
                },
            ],
        )
        .unwrap()
    }

    /// The prefix identifying the root component.
    pub fn root_prefix(&self) -> &str {
        &self.root_prefix
    }

    /// Classify a component name. Names matching no rule return `None`
    /// and are left untouched by assembly.
    pub fn classify(&self, name: &str) -> Option<ComponentKind> {
        if name.starts_with(&self.root_prefix) {
            Some(ComponentKind::Root)
        } else if self.rules.iter().any(|r| name.starts_with(&r.prefix)) {
            Some(ComponentKind::Subproject)
        } else {
            None
        }
    }

    /// The relative destination for a subproject name, if any rule matches.
    pub fn dest_for(&self, name: &str) -> Option<&PathBuf> {
        self.rules
            .iter()
            .find(|r| name.starts_with(&r.prefix))
            .map(|r| &r.dest)
    }
}

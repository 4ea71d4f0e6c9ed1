//! Project-wide build options, supplied once and reused across stages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Immutable project-wide configuration shared by every stage.
///
/// Per-stage additions (compiler-path overrides for stages 2 and 3) are
/// layered on top by the configurer; the base set never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Final installation prefix. Only stage 3's output is ever
    /// installed there.
    #[serde(rename = "install-prefix")]
    pub install_prefix: PathBuf,

    /// Parallelism factor passed to build and verification commands.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,

    /// Target architectures handed to the configure step.
    #[serde(default = "default_targets")]
    pub targets: Vec<String>,

    /// CMake build type.
    #[serde(default = "default_build_type", rename = "build-type")]
    pub build_type: String,

    /// Extra project-wide configure flags.
    #[serde(default, rename = "extra-flags")]
    pub extra_flags: Vec<String>,
}

fn default_parallelism() -> usize {
    1
}

fn default_targets() -> Vec<String> {
    vec!["X86".to_string()]
}

fn default_build_type() -> String {
    "Release".to_string()
}

impl BuildOptions {
    /// Options with the original defaults for the given prefix.
    pub fn new(install_prefix: impl Into<PathBuf>) -> Self {
        BuildOptions {
            install_prefix: install_prefix.into(),
            parallelism: default_parallelism(),
            targets: default_targets(),
            build_type: default_build_type(),
            extra_flags: Vec::new(),
        }
    }

    /// Set the parallelism factor.
    pub fn with_parallelism(mut self, jobs: usize) -> Self {
        self.parallelism = jobs;
        self
    }

    /// The configure flags common to every stage.
    pub fn common_flags(&self) -> Vec<String> {
        let mut flags = vec![
            format!("-DCMAKE_BUILD_TYPE={}", self.build_type),
            "-DLLVM_ENABLE_ASSERTIONS=ON".to_string(),
            format!("-DLLVM_TARGETS_TO_BUILD={}", self.targets.join(";")),
        ];
        flags.extend(self.extra_flags.iter().cloned());
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_flags_defaults() {
        let opts = BuildOptions::new("/opt/toolchain");
        let flags = opts.common_flags();

        assert!(flags.contains(&"-DCMAKE_BUILD_TYPE=Release".to_string()));
        assert!(flags.contains(&"-DLLVM_ENABLE_ASSERTIONS=ON".to_string()));
        assert!(flags.contains(&"-DLLVM_TARGETS_TO_BUILD=X86".to_string()));
    }

    #[test]
    fn test_multiple_targets_joined() {
        let mut opts = BuildOptions::new("/opt/toolchain");
        opts.targets = vec!["X86".to_string(), "AArch64".to_string()];

        assert!(opts
            .common_flags()
            .contains(&"-DLLVM_TARGETS_TO_BUILD=X86;AArch64".to_string()));
    }
}

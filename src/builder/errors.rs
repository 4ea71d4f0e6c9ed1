//! Pipeline error types.
//!
//! Every failure here is fatal: the bootstrap has no notion of a
//! transient error. A failed configure, build, or test run means the
//! toolchain-in-progress is unusable and must not be carried forward.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A fatal failure in the bootstrap pipeline.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("no root source component matched prefix `{root_prefix}` (source not unpacked?)")]
    MissingRootSource { root_prefix: String },

    #[error("failed to relocate `{component}` from {from} to {to}")]
    Relocation {
        component: String,
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create stage directory {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("stage {stage} compiler binary missing or not executable: {path}")]
    MissingCompilerBinary { stage: usize, path: PathBuf },

    #[error("stage {stage} configuration failed (exit code {exit_code:?})")]
    ConfigurationFailed {
        stage: usize,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("stage {stage} build failed (exit code {exit_code:?})")]
    BuildFailed {
        stage: usize,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("stage {stage} verification failed (exit code {exit_code:?})")]
    VerificationFailed {
        stage: usize,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("install from stage 3 failed (exit code {exit_code:?})")]
    InstallFailed {
        exit_code: Option<i32>,
        stderr: String,
    },
}

impl BootstrapError {
    /// Short kind name for run reports.
    pub fn kind(&self) -> &'static str {
        match self {
            BootstrapError::MissingRootSource { .. } => "missing-root-source",
            BootstrapError::Relocation { .. } => "relocation",
            BootstrapError::DirectoryCreation { .. } => "directory-creation",
            BootstrapError::MissingCompilerBinary { .. } => "missing-compiler-binary",
            BootstrapError::ConfigurationFailed { .. } => "configuration-failed",
            BootstrapError::BuildFailed { .. } => "build-failed",
            BootstrapError::VerificationFailed { .. } => "verification-failed",
            BootstrapError::InstallFailed { .. } => "install-failed",
        }
    }
}

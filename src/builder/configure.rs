//! Stage configuration.
//!
//! Configuration is re-derived for every stage rather than cached,
//! because the compiler paths differ between stages: stage 1 uses the
//! ambient system compiler, stages 2 and 3 use the previous stage's
//! freshly built binaries.

use std::path::Path;

use crate::builder::errors::BootstrapError;
use crate::core::options::BuildOptions;
use crate::core::stage::{Stage, StageStatus};
use crate::util::fs::is_executable;
use crate::util::process::{CommandRunner, ProcessBuilder};

/// Produces and executes one configure command per stage.
pub struct StageConfigurer<'a> {
    source_tree: &'a Path,
    options: &'a BuildOptions,
}

impl<'a> StageConfigurer<'a> {
    pub fn new(source_tree: &'a Path, options: &'a BuildOptions) -> Self {
        StageConfigurer {
            source_tree,
            options,
        }
    }

    /// Run the configure command inside the stage's work directory.
    ///
    /// For stages with a compiler pair, both binaries must exist and be
    /// executable before any command is issued. A non-zero exit is fatal
    /// for the whole pipeline.
    pub fn configure(
        &self,
        runner: &dyn CommandRunner,
        stage: &mut Stage,
    ) -> Result<(), BootstrapError> {
        stage.advance(StageStatus::Configuring);

        let cmd = match self.command_for(stage) {
            Ok(cmd) => cmd,
            Err(e) => {
                stage.advance(StageStatus::Failed);
                return Err(e);
            }
        };
        tracing::info!("stage {}: configuring", stage.index());

        match runner.run(&cmd) {
            Ok(output) if output.success() => Ok(()),
            Ok(output) => {
                stage.advance(StageStatus::Failed);
                Err(BootstrapError::ConfigurationFailed {
                    stage: stage.index(),
                    exit_code: output.exit_code,
                    stderr: output.stderr,
                })
            }
            Err(e) => {
                stage.advance(StageStatus::Failed);
                Err(BootstrapError::ConfigurationFailed {
                    stage: stage.index(),
                    exit_code: None,
                    stderr: e.to_string(),
                })
            }
        }
    }

    /// Build the configure command without executing it.
    pub fn command_for(&self, stage: &Stage) -> Result<ProcessBuilder, BootstrapError> {
        let mut cmd = ProcessBuilder::new("cmake").cwd(stage.work_dir());

        if let Some(compilers) = stage.compilers() {
            for binary in [&compilers.cc, &compilers.cxx] {
                if !is_executable(binary) {
                    return Err(BootstrapError::MissingCompilerBinary {
                        stage: stage.index(),
                        path: binary.clone(),
                    });
                }
            }

            cmd = cmd
                .arg(format!(
                    "-DCMAKE_INSTALL_PREFIX={}",
                    self.options.install_prefix.display()
                ))
                .arg(format!("-DCMAKE_C_COMPILER={}", compilers.cc.display()))
                .arg(format!("-DCMAKE_CXX_COMPILER={}", compilers.cxx.display()));
        }

        cmd = cmd.args(self.options.common_flags());

        // The source tree is always the assembled root, regardless of stage.
        Ok(cmd.arg(self.source_tree))
    }
}

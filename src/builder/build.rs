//! Stage build and verification.
//!
//! Build and verification are deliberately one unit per stage: a stage
//! producing a compiler that fails its own test suite must never be used
//! to build the next stage, since the bootstrap's correctness depends
//! transitively on every earlier stage's health.

use crate::builder::errors::BootstrapError;
use crate::core::stage::{Stage, StageStatus};
use crate::util::process::{CommandRunner, ProcessBuilder};

/// Runs a stage's build followed by its full verification suite.
pub struct StageBuilder {
    parallelism: usize,
}

impl StageBuilder {
    pub fn new(parallelism: usize) -> Self {
        StageBuilder { parallelism }
    }

    /// Build, then verify, inside the stage's work directory.
    ///
    /// The stage reaches `Done` only if both commands exit zero; any
    /// failure (including an operator interrupt killing the child
    /// process) transitions it to `Failed` and is fatal to the pipeline.
    pub fn build_and_verify(
        &self,
        runner: &dyn CommandRunner,
        stage: &mut Stage,
    ) -> Result<(), BootstrapError> {
        stage.advance(StageStatus::Building);
        tracing::info!("stage {}: building", stage.index());

        let build_cmd = self.build_command(stage);
        match runner.run(&build_cmd) {
            Ok(output) if output.success() => {}
            Ok(output) => {
                stage.advance(StageStatus::Failed);
                return Err(BootstrapError::BuildFailed {
                    stage: stage.index(),
                    exit_code: output.exit_code,
                    stderr: output.stderr,
                });
            }
            Err(e) => {
                stage.advance(StageStatus::Failed);
                return Err(BootstrapError::BuildFailed {
                    stage: stage.index(),
                    exit_code: None,
                    stderr: e.to_string(),
                });
            }
        }

        stage.advance(StageStatus::Verifying);
        tracing::info!("stage {}: running tests", stage.index());

        let verify_cmd = self.verify_command(stage);
        match runner.run(&verify_cmd) {
            Ok(output) if output.success() => {}
            Ok(output) => {
                stage.advance(StageStatus::Failed);
                return Err(BootstrapError::VerificationFailed {
                    stage: stage.index(),
                    exit_code: output.exit_code,
                    stderr: output.stderr,
                });
            }
            Err(e) => {
                stage.advance(StageStatus::Failed);
                return Err(BootstrapError::VerificationFailed {
                    stage: stage.index(),
                    exit_code: None,
                    stderr: e.to_string(),
                });
            }
        }

        stage.advance(StageStatus::Done);
        tracing::info!("stage {}: done", stage.index());
        Ok(())
    }

    fn build_command(&self, stage: &Stage) -> ProcessBuilder {
        ProcessBuilder::new("make")
            .arg("-j")
            .arg(self.parallelism.to_string())
            .cwd(stage.work_dir())
    }

    fn verify_command(&self, stage: &Stage) -> ProcessBuilder {
        ProcessBuilder::new("make")
            .arg("-j")
            .arg(self.parallelism.to_string())
            .arg("check-all")
            .cwd(stage.work_dir())
    }
}

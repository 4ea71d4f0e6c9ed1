//! Final install from stage 3.
//!
//! Stages 1 and 2 are intermediate and are never installed. The install
//! prefix was baked in at configure time, so the install command itself
//! takes no prefix argument.

use crate::builder::errors::BootstrapError;
use crate::core::stage::Stage;
use crate::util::process::{CommandRunner, ProcessBuilder};

/// Install the toolchain from a completed stage 3.
pub fn install_from(runner: &dyn CommandRunner, stage: &Stage) -> Result<(), BootstrapError> {
    debug_assert!(stage.is_done(), "install from a stage that is not done");
    debug_assert_eq!(stage.index(), 3, "install must source stage 3");

    tracing::info!("installing from {}", stage.work_dir().display());

    let cmd = ProcessBuilder::new("make")
        .arg("install")
        .cwd(stage.work_dir());

    match runner.run(&cmd) {
        Ok(output) if output.success() => Ok(()),
        Ok(output) => Err(BootstrapError::InstallFailed {
            exit_code: output.exit_code,
            stderr: output.stderr,
        }),
        Err(e) => Err(BootstrapError::InstallFailed {
            exit_code: None,
            stderr: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stage::StageStatus;
    use crate::test_support::StubRunner;
    use std::path::{Path, PathBuf};

    fn done_stage3() -> Stage {
        let mut stage = Stage::new(3, PathBuf::from("/build/stage.3"), None);
        stage.advance(StageStatus::Done);
        stage
    }

    #[test]
    fn test_install_runs_in_stage3_dir() {
        let runner = StubRunner::succeeding();
        install_from(&runner, &done_stage3()).unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].get_args(), ["install"]);
        assert_eq!(calls[0].get_cwd(), Some(Path::new("/build/stage.3")));
    }

    #[test]
    fn test_install_failure_surfaces_exit_code() {
        let runner = StubRunner::failing_with(2);
        let err = install_from(&runner, &done_stage3()).unwrap_err();

        assert!(matches!(
            err,
            BootstrapError::InstallFailed {
                exit_code: Some(2),
                ..
            }
        ));
    }
}

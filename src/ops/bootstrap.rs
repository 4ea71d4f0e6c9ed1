//! Implementation of `toolforge run`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::builder::{BootstrapOrchestrator, RunReport};
use crate::core::component::SourceComponent;
use crate::core::manifest::Manifest;
use crate::util::process::{find_c_compiler, find_cmake, SystemRunner};

/// Options for the run command.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Override the manifest's parallelism factor.
    pub jobs: Option<usize>,

    /// Where to write the JSON run report, if anywhere.
    pub report_path: Option<PathBuf>,
}

/// Run the full bootstrap described by a manifest.
///
/// The report is written whether the run completes or aborts, so an
/// external driver always sees the precise failure point.
pub fn run(manifest_path: &Path, opts: &RunOptions) -> Result<RunReport> {
    let manifest = Manifest::load(manifest_path)?;
    let layout = manifest.source_layout()?;

    // Stage 1 needs an ambient compiler, and every stage needs cmake.
    if find_cmake().is_none() {
        bail!(
            "cmake not found\n\
             \n\
             CMake is required to configure every bootstrap stage.\n\
             Install CMake and ensure it's in your PATH."
        );
    }
    if find_c_compiler().is_none() {
        bail!(
            "no system C compiler found\n\
             \n\
             Stage 1 builds with the ambient compiler. Install one or set CC."
        );
    }

    let mut options = manifest.options.clone();
    if let Some(jobs) = opts.jobs {
        options.parallelism = jobs;
    }

    let components: Vec<SourceComponent> = manifest
        .components
        .iter()
        .map(|c| SourceComponent::new(&c.name, &c.path))
        .collect();
    if components.is_empty() {
        bail!("manifest declares no components");
    }

    let mut orchestrator = BootstrapOrchestrator::new(
        SystemRunner,
        layout,
        options,
        manifest.build_root.clone(),
    );

    let outcome = orchestrator.run(components);
    let report = orchestrator.report();

    if let Some(path) = &opts.report_path {
        write_report(&report, path)?;
    }

    outcome?;
    Ok(report)
}

/// Write a run report as pretty-printed JSON.
pub fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write report: {}", path.display()))?;
    tracing::info!("wrote run report to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{FailureRecord, StageReport, StepKind};
    use crate::core::stage::StageStatus;
    use tempfile::TempDir;

    #[test]
    fn test_report_serialization() {
        let report = RunReport {
            phase: "aborted".to_string(),
            stages: vec![StageReport {
                index: 1,
                status: StageStatus::Failed,
                work_dir: PathBuf::from("/build/stage.1"),
            }],
            failure: Some(FailureRecord {
                stage: Some(1),
                step: StepKind::Verify,
                kind: "verification-failed".to_string(),
                message: "stage 1 verification failed (exit code Some(1))".to_string(),
            }),
        };

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("report.json");
        write_report(&report, &path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["phase"], "aborted");
        assert_eq!(json["stages"][0]["status"], "failed");
        assert_eq!(json["failure"]["step"], "verify");
        assert_eq!(json["failure"]["stage"], 1);
    }

    #[test]
    fn test_empty_component_list_rejected() {
        let tmp = TempDir::new().unwrap();
        let manifest_path = tmp.path().join("Toolforge.toml");
        std::fs::write(
            &manifest_path,
            r#"
build-root = "/tmp/build"

[options]
install-prefix = "/opt/toolchain"
"#,
        )
        .unwrap();

        let err = run(&manifest_path, &RunOptions::default()).unwrap_err();
        let msg = format!("{:#}", err);
        // Either preflight or the component check fires, depending on
        // what the host has installed; both are refusals before any
        // filesystem mutation.
        assert!(msg.contains("no components") || msg.contains("not found"));
    }
}

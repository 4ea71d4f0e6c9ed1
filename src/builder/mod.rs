//! The bootstrap pipeline: stage directories, per-stage configure and
//! build/verify, final install, and the orchestrator tying them together.

pub mod build;
pub mod configure;
pub mod dirs;
pub mod errors;
pub mod install;

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use serde::Serialize;

use crate::builder::build::StageBuilder;
use crate::builder::configure::StageConfigurer;
use crate::builder::dirs::StageDirectoryManager;
use crate::builder::errors::BootstrapError;
use crate::core::component::SourceComponent;
use crate::core::layout::SourceLayout;
use crate::core::options::BuildOptions;
use crate::core::stage::{CompilerPair, Stage, StageStatus};
use crate::ops::assemble::SourceAssembler;
use crate::util::process::CommandRunner;

pub const STAGE_COUNT: usize = 3;

/// Where the pipeline currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    NotStarted,
    Assembling,
    Stage(usize),
    Installing,
    Completed,
    Aborted,
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelinePhase::NotStarted => write!(f, "not-started"),
            PipelinePhase::Assembling => write!(f, "assembling"),
            PipelinePhase::Stage(n) => write!(f, "stage-{}", n),
            PipelinePhase::Installing => write!(f, "installing"),
            PipelinePhase::Completed => write!(f, "completed"),
            PipelinePhase::Aborted => write!(f, "aborted"),
        }
    }
}

/// The sub-step at which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Assemble,
    Allocate,
    Configure,
    Build,
    Verify,
    Install,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepKind::Assemble => "assemble",
            StepKind::Allocate => "allocate",
            StepKind::Configure => "configure",
            StepKind::Build => "build",
            StepKind::Verify => "verify",
            StepKind::Install => "install",
        };
        f.write_str(s)
    }
}

/// The precise failure point of an aborted run.
#[derive(Debug, Clone, Serialize)]
pub struct FailureRecord {
    pub stage: Option<usize>,
    pub step: StepKind,
    pub kind: String,
    pub message: String,
}

/// Per-stage summary for run reports.
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub index: usize,
    pub status: StageStatus,
    pub work_dir: PathBuf,
}

/// Machine-readable summary of a run, successful or aborted.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub phase: String,
    pub stages: Vec<StageReport>,
    pub failure: Option<FailureRecord>,
}

/// Sequences assembly, the three bootstrap stages, and the final install.
///
/// Owns the stage records and their status transitions. The invariant
/// held here is that no stage begins until the previous stage has fully
/// succeeded: stage N+1's configure observes stage N's completed,
/// verified output or does not run at all.
pub struct BootstrapOrchestrator<R: CommandRunner> {
    runner: R,
    layout: SourceLayout,
    options: BuildOptions,
    dirs: StageDirectoryManager,
    phase: PipelinePhase,
    stages: Vec<Stage>,
    source_tree: Option<PathBuf>,
    failure: Option<FailureRecord>,
}

impl<R: CommandRunner> BootstrapOrchestrator<R> {
    pub fn new(
        runner: R,
        layout: SourceLayout,
        options: BuildOptions,
        build_root: impl Into<PathBuf>,
    ) -> Self {
        BootstrapOrchestrator {
            runner,
            layout,
            options,
            dirs: StageDirectoryManager::new(build_root),
            phase: PipelinePhase::NotStarted,
            stages: Vec::with_capacity(STAGE_COUNT),
            source_tree: None,
            failure: None,
        }
    }

    pub fn phase(&self) -> PipelinePhase {
        self.phase
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The assembled source tree, once assembly has succeeded.
    pub fn source_tree(&self) -> Option<&Path> {
        self.source_tree.as_deref()
    }

    /// The recorded failure point, if the run was aborted.
    pub fn failure(&self) -> Option<&FailureRecord> {
        self.failure.as_ref()
    }

    /// Run the whole pipeline: assemble, stages 1 through 3, install.
    ///
    /// Halts at the first failure; no stage is retried and no partial
    /// stage output is promoted to the next stage.
    pub fn run(&mut self, components: Vec<SourceComponent>) -> Result<()> {
        self.assemble(components)?;
        for _ in 0..STAGE_COUNT {
            self.run_next_stage()?;
        }
        self.install()?;
        Ok(())
    }

    /// Assemble the source tree. First step of the pipeline.
    pub fn assemble(&mut self, mut components: Vec<SourceComponent>) -> Result<()> {
        if self.phase != PipelinePhase::NotStarted {
            bail!("assembly already ran (pipeline is {})", self.phase);
        }
        self.phase = PipelinePhase::Assembling;

        let assembler = SourceAssembler::new(&self.layout);
        match assembler.assemble(&mut components) {
            Ok(tree) => {
                self.source_tree = Some(tree);
                Ok(())
            }
            Err(e) => Err(self.abort(None, StepKind::Assemble, e)),
        }
    }

    /// Run the next pending stage: allocate, configure, build, verify.
    pub fn run_next_stage(&mut self) -> Result<()> {
        let index = self.stages.len() + 1;
        match self.phase {
            PipelinePhase::Assembling | PipelinePhase::Stage(_) if index <= STAGE_COUNT => {}
            _ => bail!(
                "cannot run stage {} while pipeline is {}",
                index,
                self.phase
            ),
        }
        // Stage N only starts once stage N-1 is done.
        if let Some(prior) = self.stages.last() {
            if !prior.is_done() {
                bail!(
                    "stage {} cannot start: stage {} is {}",
                    index,
                    prior.index(),
                    prior.status()
                );
            }
        }
        let source_tree = match self.source_tree.clone() {
            Some(tree) => tree,
            None => bail!("cannot run stage {} before assembly", index),
        };

        self.phase = PipelinePhase::Stage(index);
        tracing::info!("starting stage {}", index);

        let work_dir = match self.dirs.allocate(index) {
            Ok(dir) => dir,
            Err(e) => return Err(self.abort(Some(index), StepKind::Allocate, e)),
        };

        // Stage 1 uses the ambient compiler; later stages use the prior
        // stage's freshly built binaries.
        let compilers = self
            .stages
            .last()
            .map(|prior| CompilerPair::in_stage_dir(prior.work_dir()));
        let mut stage = Stage::new(index, work_dir, compilers);

        let configurer = StageConfigurer::new(&source_tree, &self.options);
        if let Err(e) = configurer.configure(&self.runner, &mut stage) {
            self.stages.push(stage);
            return Err(self.abort(Some(index), StepKind::Configure, e));
        }

        let builder = StageBuilder::new(self.options.parallelism);
        if let Err(e) = builder.build_and_verify(&self.runner, &mut stage) {
            let step = match e {
                BootstrapError::VerificationFailed { .. } => StepKind::Verify,
                _ => StepKind::Build,
            };
            self.stages.push(stage);
            return Err(self.abort(Some(index), step, e));
        }

        self.stages.push(stage);
        Ok(())
    }

    /// Install the toolchain from stage 3's output. Last step.
    pub fn install(&mut self) -> Result<()> {
        let stage3 = match self.stages.last() {
            Some(s) if s.index() == STAGE_COUNT && s.is_done() => s,
            _ => bail!(
                "cannot install: stage {} has not completed",
                STAGE_COUNT
            ),
        };
        self.phase = PipelinePhase::Installing;

        if let Err(e) = install::install_from(&self.runner, stage3) {
            return Err(self.abort(Some(STAGE_COUNT), StepKind::Install, e));
        }

        self.phase = PipelinePhase::Completed;
        tracing::info!("bootstrap completed");
        Ok(())
    }

    /// Standalone verification entry point.
    ///
    /// Verification already ran inline after every stage's build, so a
    /// completed pipeline has nothing left to check. Calling this before
    /// the pipeline completes is refused: it would otherwise look like a
    /// test pass when no tests ran.
    pub fn verify(&self) -> Result<()> {
        if self.phase != PipelinePhase::Completed {
            bail!(
                "verification runs inline with each stage; the pipeline is {} and has not \
                 been verified",
                self.phase
            );
        }
        Ok(())
    }

    /// Summary of the run for external reporting.
    pub fn report(&self) -> RunReport {
        RunReport {
            phase: self.phase.to_string(),
            stages: self
                .stages
                .iter()
                .map(|s| StageReport {
                    index: s.index(),
                    status: s.status(),
                    work_dir: s.work_dir().to_path_buf(),
                })
                .collect(),
            failure: self.failure.clone(),
        }
    }

    fn abort(
        &mut self,
        stage: Option<usize>,
        step: StepKind,
        error: BootstrapError,
    ) -> anyhow::Error {
        tracing::error!(
            "pipeline aborted at {} step{}: {}",
            step,
            stage.map(|n| format!(" (stage {})", n)).unwrap_or_default(),
            error
        );
        self.phase = PipelinePhase::Aborted;
        self.failure = Some(FailureRecord {
            stage,
            step,
            kind: error.kind().to_string(),
            message: error.to_string(),
        });
        error.into()
    }
}

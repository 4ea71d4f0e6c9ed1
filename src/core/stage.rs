//! Bootstrap stages and their status lifecycle.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Status of a single bootstrap stage.
///
/// Transitions are monotonic: a stage only ever moves forward through
/// `Pending → Configuring → Building → Verifying → Done`, or to `Failed`
/// from any non-terminal state. There are no backward transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Pending,
    Configuring,
    Building,
    Verifying,
    Done,
    Failed,
}

impl StageStatus {
    fn rank(self) -> u8 {
        match self {
            StageStatus::Pending => 0,
            StageStatus::Configuring => 1,
            StageStatus::Building => 2,
            StageStatus::Verifying => 3,
            StageStatus::Done => 4,
            StageStatus::Failed => 5,
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StageStatus::Pending => "pending",
            StageStatus::Configuring => "configuring",
            StageStatus::Building => "building",
            StageStatus::Verifying => "verifying",
            StageStatus::Done => "done",
            StageStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Paths to a stage's produced C and C++ compiler binaries.
#[derive(Debug, Clone)]
pub struct CompilerPair {
    pub cc: PathBuf,
    pub cxx: PathBuf,
}

impl CompilerPair {
    /// The compilers a stage's `bin/` output is expected to contain.
    pub fn in_stage_dir(work_dir: &Path) -> Self {
        CompilerPair {
            cc: work_dir.join("bin").join("clang"),
            cxx: work_dir.join("bin").join("clang++"),
        }
    }
}

/// One bootstrap stage: an isolated build directory plus the compilers
/// used to configure it.
///
/// Stage 1 has no compiler pair (the ambient system compiler is used);
/// stages 2 and 3 carry the prior stage's binaries.
#[derive(Debug)]
pub struct Stage {
    index: usize,
    work_dir: PathBuf,
    compilers: Option<CompilerPair>,
    status: StageStatus,
}

impl Stage {
    /// Create a pending stage with its freshly allocated work directory.
    pub fn new(index: usize, work_dir: PathBuf, compilers: Option<CompilerPair>) -> Self {
        debug_assert!((1..=3).contains(&index), "stage index out of range");
        Stage {
            index,
            work_dir,
            compilers,
            status: StageStatus::Pending,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Compilers used to configure this stage, if not the ambient ones.
    pub fn compilers(&self) -> Option<&CompilerPair> {
        self.compilers.as_ref()
    }

    pub fn status(&self) -> StageStatus {
        self.status
    }

    /// Whether this stage may be used as the predecessor of the next one.
    pub fn is_done(&self) -> bool {
        self.status == StageStatus::Done
    }

    /// Advance the stage status. Backward transitions and transitions
    /// out of a terminal state violate the stage lifecycle and panic in
    /// debug builds.
    pub(crate) fn advance(&mut self, next: StageStatus) {
        debug_assert!(
            self.status != StageStatus::Done
                && self.status != StageStatus::Failed
                && next.rank() > self.status.rank(),
            "backward stage transition: {} -> {} (stage {})",
            self.status,
            next,
            self.index
        );
        tracing::debug!("stage {}: {} -> {}", self.index, self.status, next);
        self.status = next;
    }
}

//! Toolforge - a staged bootstrap build orchestrator for self-hosting
//! compiler toolchains.
//!
//! This crate assembles multiple pre-extracted source components into one
//! canonical source tree, then drives a three-stage bootstrap: each stage
//! configures against the previous stage's compiler, builds, and runs the
//! project's full test suite before the next stage is allowed to begin.
//! The final toolchain is installed exclusively from stage 3's output.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for Toolforge unit tests.
///
/// Only available when compiling tests. Provides a recording stub
/// command runner and source-tree fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{
    component::{ComponentKind, SourceComponent},
    layout::SourceLayout,
    options::BuildOptions,
    stage::{CompilerPair, Stage, StageStatus},
};

pub use builder::errors::BootstrapError;
pub use builder::{BootstrapOrchestrator, PipelinePhase};

//! High-level operations: source-tree assembly and the bootstrap run.

pub mod assemble;
pub mod bootstrap;

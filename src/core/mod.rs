//! Core data model: source components, layout rules, stages, and options.

pub mod component;
pub mod layout;
pub mod manifest;
pub mod options;
pub mod stage;

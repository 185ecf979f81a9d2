//! Shared domain types: build targets and pipeline phases.

pub mod phase;
pub mod target;

pub use phase::{BuildOperation, Phase};
pub use target::{BuildTarget, TargetGroup};

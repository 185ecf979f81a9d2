//! Hook system: typed contexts, registry, and pipeline runner.

pub mod definitions;
pub mod registry;
pub mod runner;

pub use definitions::{BuildContext, BuildKind, BuildResult, PostContext, Stage};
pub use registry::{HookRegistry, PhaseHooks};
pub use runner::PipelineRunner;

//! # simplebuild-hooks
//!
//! Hook framework for SimpleBuild. Provides:
//!
//! - Capability traits for the four hook phases (pre/post × asset bundle/player)
//! - Hook registry with explicit, order-sorted registration
//! - Two-phase pipeline runner with fail-fast hook semantics
//! - Closure adapters for quick hook and build action creation

pub mod error;
pub mod hooks;
pub mod prelude;
pub mod traits;

pub use error::{HookError, PipelineError, RegistryError};
pub use hooks::definitions::{BuildContext, BuildKind, BuildResult, PostContext, Stage};
pub use hooks::registry::{
    BuildAction, HookInfo, HookRegistry, OrderedCallback, PhaseHooks, PostprocessHook,
    PreprocessHook,
};
pub use hooks::runner::{PipelineRunner, RunState};

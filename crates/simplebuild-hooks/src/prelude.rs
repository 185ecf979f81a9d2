//! Prelude for hook authors.
//!
//! ```ignore
//! use simplebuild_hooks::prelude::*;
//! ```

pub use async_trait::async_trait;

pub use simplebuild_core::types::{BuildTarget, Phase};

pub use crate::error::HookError;
pub use crate::hooks::definitions::{BuildContext, BuildKind, BuildResult, PostContext};
pub use crate::hooks::registry::{
    BuildAction, OrderedCallback, PhaseHooks, PostprocessHook, PreprocessHook,
};
pub use crate::traits::{FnAction, FnHook};

//! Hook, registry, and pipeline error types.

use std::time::Duration;

use thiserror::Error;

use simplebuild_core::error::AppError;
use simplebuild_core::types::Phase;

use crate::hooks::definitions::Stage;

/// Errors a hook can raise while it runs.
#[derive(Debug, Error)]
pub enum HookError {
    /// The hook reported a failure.
    #[error("{0}")]
    Failed(String),

    /// An external command exited unsuccessfully.
    #[error("command '{command}' exited with code {code}: {stderr}")]
    Command {
        /// The command that was run.
        command: String,
        /// Exit code, `-1` when terminated by a signal.
        code: i32,
        /// Captured standard error.
        stderr: String,
    },

    /// The hook did not finish in time.
    #[error("timed out after {limit:?}")]
    Timeout {
        /// The limit that was exceeded.
        limit: Duration,
    },

    /// The hook panicked.
    #[error("panicked: {0}")]
    Panicked(String),

    /// I/O failure inside the hook.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failure inside the hook.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HookError {
    /// Creates a generic failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Errors raised while registering hooks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A hook was registered without a name.
    #[error("hook names must not be empty")]
    EmptyName,

    /// A hook with the same name is already registered in this registry.
    #[error("hook '{name}' is already registered")]
    DuplicateName {
        /// The conflicting name.
        name: String,
    },
}

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A hook failed; the remaining hooks and stages were skipped.
    ///
    /// When a post hook fails after a failed build, `build_failure` carries
    /// the build's own failure reason so neither failure is lost.
    #[error(
        "{stage} '{hook}' (order {order}) failed in {phase}: {source}{}",
        build_failure_note(.build_failure)
    )]
    HookInvocation {
        /// Phase the hook was registered for.
        phase: Phase,
        /// Stage at which the failure happened.
        stage: Stage,
        /// Name of the failing hook.
        hook: String,
        /// Declared order of the failing hook.
        order: i32,
        /// What the hook raised.
        #[source]
        source: HookError,
        /// Failure reason of the build itself, if it failed before the hook.
        build_failure: Option<String>,
    },
}

fn build_failure_note(build_failure: &Option<String>) -> String {
    match build_failure {
        Some(reason) => format!(" (build also failed: {reason})"),
        None => String::new(),
    }
}

impl PipelineError {
    /// Returns the name of the hook that failed.
    pub fn hook_name(&self) -> &str {
        match self {
            Self::HookInvocation { hook, .. } => hook,
        }
    }

    /// Returns the stage at which the pipeline stopped.
    pub fn stage(&self) -> Stage {
        match self {
            Self::HookInvocation { stage, .. } => *stage,
        }
    }

    /// Returns the build's failure reason when the build failed before a
    /// post hook did.
    pub fn build_failure(&self) -> Option<&str> {
        match self {
            Self::HookInvocation { build_failure, .. } => build_failure.as_deref(),
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        AppError::hook(err.to_string())
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        AppError::validation(err.to_string())
    }
}

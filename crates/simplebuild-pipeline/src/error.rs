//! Errors raised by the build pipelines.

use thiserror::Error;

use simplebuild_core::error::AppError;
use simplebuild_core::types::{BuildOperation, BuildTarget};
use simplebuild_hooks::{PipelineError, RegistryError};

/// Errors that prevent a build pipeline from producing a result.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The target has no output mapping for this operation. Raised before any
    /// hook or build action runs.
    #[error("{operation} builds are not supported for target {target}")]
    UnsupportedTarget {
        /// The requested target.
        target: BuildTarget,
        /// The requested operation.
        operation: BuildOperation,
    },

    /// A hook aborted the pipeline.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// A hook could not be registered.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl From<BuildError> for AppError {
    fn from(err: BuildError) -> Self {
        match err {
            other @ BuildError::UnsupportedTarget { .. } => {
                AppError::unsupported_target(other.to_string())
            }
            BuildError::Pipeline(inner) => inner.into(),
            BuildError::Registry(inner) => inner.into(),
        }
    }
}

//! Build kinds, hook contexts, and build results.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use simplebuild_core::types::{BuildOperation, BuildTarget, Phase};

/// A kind of build a pipeline can run.
///
/// Each kind fixes the options its hooks observe and the report its build
/// action produces, and names the two phases its hooks run in. Keeping kinds
/// as distinct types means a hook written for asset bundles cannot be
/// registered on the player pipeline.
pub trait BuildKind: fmt::Debug + Clone + Send + Sync + 'static {
    /// Build options visible to hooks and the build action.
    type Options: fmt::Debug + Clone + Serialize + Send + Sync;
    /// Report produced by a successful build action.
    type Report: fmt::Debug + Clone + Serialize + Send + Sync;

    /// The operation this kind performs.
    const OPERATION: BuildOperation;
    /// Phase in which preprocess hooks run.
    const PRE_PHASE: Phase;
    /// Phase in which postprocess hooks run.
    const POST_PHASE: Phase;
}

/// Point of the pipeline at which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// A hook running before the build action.
    PreHook,
    /// The build action itself.
    BuildAction,
    /// A hook running after the build action.
    PostHook,
}

impl Stage {
    /// Returns the human-readable name of this stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreHook => "pre-hook",
            Self::BuildAction => "build action",
            Self::PostHook => "post-hook",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a build action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum BuildResult<R> {
    /// The build completed and produced a report.
    Success(R),
    /// The build failed.
    Failure {
        /// Why the build failed.
        reason: String,
    },
}

impl<R> BuildResult<R> {
    /// Creates a failure result.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    /// Returns whether the build succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns whether the build failed.
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Returns the report of a successful build.
    pub fn report(&self) -> Option<&R> {
        match self {
            Self::Success(report) => Some(report),
            Self::Failure { .. } => None,
        }
    }

    /// Returns the failure reason of a failed build.
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { reason } => Some(reason),
        }
    }

    /// Returns `"success"` or `"failure"`.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::Failure { .. } => "failure",
        }
    }
}

/// Immutable context shared by preprocess hooks and the build action.
#[derive(Debug, Clone)]
pub struct BuildContext<B: BuildKind> {
    /// Identifier of this pipeline run.
    pub build_id: Uuid,
    /// Platform being built.
    pub target: BuildTarget,
    /// Where the build output is written.
    pub output_path: PathBuf,
    /// Build options.
    pub options: B::Options,
    /// When the run started.
    pub started_at: DateTime<Utc>,
}

impl<B: BuildKind> BuildContext<B> {
    /// Creates a context for a new run.
    pub fn new(target: BuildTarget, output_path: impl Into<PathBuf>, options: B::Options) -> Self {
        Self {
            build_id: Uuid::now_v7(),
            target,
            output_path: output_path.into(),
            options,
            started_at: Utc::now(),
        }
    }

    /// Returns the output path.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Returns the operation of this build.
    pub fn operation(&self) -> BuildOperation {
        B::OPERATION
    }
}

/// Context given to postprocess hooks: the build context plus its result.
#[derive(Debug, Clone)]
pub struct PostContext<B: BuildKind> {
    /// The context the build ran with.
    pub build: BuildContext<B>,
    /// What the build action returned.
    pub result: BuildResult<B::Report>,
    /// When the build action returned.
    pub finished_at: DateTime<Utc>,
}

impl<B: BuildKind> PostContext<B> {
    /// Creates a post context from a finished build.
    pub fn new(build: BuildContext<B>, result: BuildResult<B::Report>) -> Self {
        Self {
            build,
            result,
            finished_at: Utc::now(),
        }
    }

    /// Returns the platform that was built.
    pub fn target(&self) -> BuildTarget {
        self.build.target
    }

    /// Returns the output path.
    pub fn output_path(&self) -> &Path {
        &self.build.output_path
    }

    /// Returns the build options.
    pub fn options(&self) -> &B::Options {
        &self.build.options
    }

    /// Returns whether the build succeeded.
    pub fn succeeded(&self) -> bool {
        self.result.is_success()
    }
}

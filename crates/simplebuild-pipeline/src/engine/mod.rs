//! External build engines.
//!
//! The actual packaging and player compilation is owned by the game editor.
//! A [`BuildEngine`] drives it for one request and reports the outcome;
//! [`EngineAction`] adapts an engine to the pipeline's build action and
//! prepares the output directory first, so nothing is written to disk
//! until every preprocess hook has passed.

pub mod dry_run;
pub mod editor;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use simplebuild_hooks::{BuildAction, BuildContext, BuildResult};

use crate::asset_bundle::AssetBundleBuild;
use crate::player::{PlayerBuild, should_create_directory};

pub use dry_run::DryRunEngine;
pub use editor::EditorEngine;

/// Errors from driving the build engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine executable was not found.
    #[error("build engine executable not found: {0}")]
    NotFound(String),

    /// The engine did not finish in time.
    #[error("build engine timed out after {0} seconds")]
    Timeout(u64),

    /// The engine exited with a non-zero code.
    #[error("build engine failed with exit code {code}: {output}")]
    ProcessFailed {
        /// The exit code.
        code: i32,
        /// Tail of the engine's error output.
        output: String,
    },

    /// The output directory could not be created.
    #[error("failed to prepare output directory {}: {source}", path.display())]
    OutputDirectory {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The engine was terminated by a signal.
    #[error("build engine was killed (signal termination)")]
    Killed,

    /// I/O error while driving the engine.
    #[error("I/O error while running build engine: {0}")]
    Io(#[from] std::io::Error),

    /// The request could not be serialized.
    #[error("failed to serialize build request: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Report of a finished engine invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineReport {
    /// Where the output was written.
    pub output_path: PathBuf,
    /// Wall-clock duration of the invocation.
    pub duration_ms: u64,
    /// Engine exit code, when a process was run.
    pub exit_code: Option<i32>,
    /// Total size of the output in bytes, when it exists.
    pub output_size: Option<u64>,
}

/// The editor-owned build API, driven for one request at a time.
#[async_trait]
pub trait BuildEngine: Send + Sync + fmt::Debug {
    /// Engine name used in logs.
    fn name(&self) -> &str;

    /// Packages asset bundles into `context.output_path`.
    async fn build_asset_bundles(
        &self,
        context: &BuildContext<AssetBundleBuild>,
    ) -> Result<EngineReport, EngineError>;

    /// Builds a player at `context.output_path`.
    async fn build_player(
        &self,
        context: &BuildContext<PlayerBuild>,
    ) -> Result<EngineReport, EngineError>;
}

/// Build action that delegates to a [`BuildEngine`].
#[derive(Debug, Clone)]
pub struct EngineAction {
    /// The engine.
    engine: Arc<dyn BuildEngine>,
}

impl EngineAction {
    /// Wraps an engine.
    pub fn new(engine: Arc<dyn BuildEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl BuildAction<AssetBundleBuild> for EngineAction {
    async fn build(&self, context: &BuildContext<AssetBundleBuild>) -> BuildResult<EngineReport> {
        let outcome = match prepare_directory(&context.output_path).await {
            Ok(()) => self.engine.build_asset_bundles(context).await,
            Err(e) => Err(e),
        };
        into_result(outcome)
    }
}

#[async_trait]
impl BuildAction<PlayerBuild> for EngineAction {
    async fn build(&self, context: &BuildContext<PlayerBuild>) -> BuildResult<EngineReport> {
        let prepared = if should_create_directory(context.target) {
            prepare_directory(&context.output_path).await
        } else {
            Ok(())
        };
        let outcome = match prepared {
            Ok(()) => self.engine.build_player(context).await,
            Err(e) => Err(e),
        };
        into_result(outcome)
    }
}

/// Creates `path` and its parents when missing.
async fn prepare_directory(path: &Path) -> Result<(), EngineError> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Ok(());
    }

    debug!(path = %path.display(), "Creating output directory");
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| EngineError::OutputDirectory {
            path: path.to_path_buf(),
            source,
        })
}

fn into_result(outcome: Result<EngineReport, EngineError>) -> BuildResult<EngineReport> {
    match outcome {
        Ok(report) => BuildResult::Success(report),
        Err(e) => BuildResult::failure(e.to_string()),
    }
}

/// Total size in bytes of a file or directory tree, `None` if it is missing.
pub async fn output_size(path: &Path) -> Option<u64> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || tree_size(&path))
        .await
        .ok()
        .flatten()
}

fn tree_size(path: &Path) -> Option<u64> {
    let metadata = std::fs::metadata(path).ok()?;
    if metadata.is_file() {
        return Some(metadata.len());
    }

    let mut total = 0;
    for entry in std::fs::read_dir(path).ok()?.flatten() {
        total += tree_size(&entry.path()).unwrap_or(0);
    }
    Some(total)
}

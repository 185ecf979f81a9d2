//! Post hook that records each run as a JSON manifest.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use simplebuild_core::config::hooks::ManifestConfig;
use simplebuild_core::types::{BuildOperation, BuildTarget};
use simplebuild_hooks::{BuildKind, HookError, OrderedCallback, PostContext, PostprocessHook};

/// Name the manifest hook registers under.
pub const MANIFEST_HOOK_NAME: &str = "build-manifest";

/// Contents of a manifest file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildManifest {
    /// Identifier shared by every hook of the run.
    pub build_id: Uuid,
    /// Asset bundle or player.
    pub operation: BuildOperation,
    /// Built target.
    pub target: BuildTarget,
    /// Resolved output location.
    pub output_path: PathBuf,
    /// Options the engine received.
    pub options: serde_json::Value,
    /// `"success"` or `"failure"`.
    pub status: String,
    /// Engine report of a successful build.
    pub report: Option<serde_json::Value>,
    /// Why the build failed.
    pub failure_reason: Option<String>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the build action returned.
    pub finished_at: DateTime<Utc>,
}

impl BuildManifest {
    /// Captures a finished run.
    pub fn from_context<B: BuildKind>(context: &PostContext<B>) -> Result<Self, serde_json::Error> {
        let report = context
            .result
            .report()
            .map(serde_json::to_value)
            .transpose()?;

        Ok(Self {
            build_id: context.build.build_id,
            operation: B::OPERATION,
            target: context.target(),
            output_path: context.output_path().to_path_buf(),
            options: serde_json::to_value(context.options())?,
            status: context.result.status().to_string(),
            report,
            failure_reason: context.result.failure_reason().map(str::to_string),
            started_at: context.build.started_at,
            finished_at: context.finished_at,
        })
    }
}

/// Writes a [`BuildManifest`] after every build, successful or not.
///
/// Runs last (order `i32::MAX`). The file goes inside the output when the
/// output is a directory, otherwise next to it.
#[derive(Debug, Clone)]
pub struct ManifestHook {
    file_name: String,
}

impl ManifestHook {
    /// Creates a hook writing manifests named `file_name`.
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// Creates a hook from the `manifest` configuration.
    pub fn from_config(config: &ManifestConfig) -> Self {
        Self::new(config.file_name.clone())
    }

    /// Where the manifest for `output_path` is written.
    pub fn manifest_path(&self, output_path: &Path) -> PathBuf {
        if output_path.is_dir() {
            return output_path.join(&self.file_name);
        }
        match output_path.parent() {
            Some(parent) => parent.join(&self.file_name),
            None => PathBuf::from(&self.file_name),
        }
    }
}

impl OrderedCallback for ManifestHook {
    fn name(&self) -> &str {
        MANIFEST_HOOK_NAME
    }

    fn order(&self) -> i32 {
        i32::MAX
    }
}

#[async_trait]
impl<B: BuildKind> PostprocessHook<B> for ManifestHook {
    async fn postprocess(&self, context: &PostContext<B>) -> Result<(), HookError> {
        let manifest = BuildManifest::from_context(context)?;
        let path = self.manifest_path(context.output_path());

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, serde_json::to_vec_pretty(&manifest)?).await?;

        info!(
            build_id = %manifest.build_id,
            status = %manifest.status,
            path = %path.display(),
            "Build manifest written"
        );
        Ok(())
    }
}

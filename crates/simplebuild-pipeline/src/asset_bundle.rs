//! Asset bundle pipeline.
//!
//! Resolves the per-target output directory and bundle options, then runs
//! the `pre_asset_bundle` hooks, the engine, and the `post_asset_bundle`
//! hooks.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use simplebuild_core::config::settings::{AssetBundleConfig, Compression};
use simplebuild_core::config::{AppConfig, BuildFlags};
use simplebuild_core::types::{BuildOperation, BuildTarget, Phase};
use simplebuild_hooks::{BuildContext, BuildKind, BuildResult, PhaseHooks, PipelineRunner};

use crate::engine::{BuildEngine, EngineAction, EngineReport};
use crate::error::BuildError;

/// Asset bundle packaging.
#[derive(Debug, Clone)]
pub struct AssetBundleBuild;

impl BuildKind for AssetBundleBuild {
    type Options = AssetBundleOptions;
    type Report = EngineReport;

    const OPERATION: BuildOperation = BuildOperation::AssetBundle;
    const PRE_PHASE: Phase = Phase::PreAssetBundle;
    const POST_PHASE: Phase = Phase::PostAssetBundle;
}

/// Options passed to the asset bundle engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBundleOptions {
    /// Compression mode.
    pub compression: Compression,
    /// Whether type tree changes are ignored by incremental builds.
    pub ignore_type_tree_changes: bool,
    /// Whether every bundle is rebuilt.
    pub force_rebuild: bool,
    /// Whether bundles are built for development.
    pub development: bool,
}

impl AssetBundleOptions {
    /// Combines the configured settings with the `BUILD_*` flags.
    ///
    /// Force rebuild needs both the configuration toggle and a flag that is
    /// not `"false"`; development needs `BUILD_DEVELOPMENT=true`.
    pub fn resolve(config: &AssetBundleConfig, flags: &BuildFlags) -> Self {
        Self {
            compression: config.compression,
            ignore_type_tree_changes: config.ignore_type_tree_changes,
            force_rebuild: config.force_rebuild && flags.force_rebuild_allowed(),
            development: flags.asset_bundle_development(),
        }
    }
}

/// Directory name bundles for `target` are written to, `None` when asset
/// bundles cannot be built for it.
pub fn output_directory(target: BuildTarget) -> Option<&'static str> {
    match target {
        BuildTarget::Ios => Some("iOS"),
        BuildTarget::Android => Some("Android"),
        t if t.is_standalone() => Some("Standalone"),
        _ => None,
    }
}

/// Runs asset bundle builds against a build engine.
#[derive(Debug)]
pub struct AssetBundleBuilder {
    config: AppConfig,
    action: EngineAction,
    hooks: PhaseHooks<AssetBundleBuild>,
    runner: PipelineRunner,
}

impl AssetBundleBuilder {
    /// Creates a builder with no hooks registered.
    pub fn new(config: &AppConfig, engine: Arc<dyn BuildEngine>) -> Self {
        let mut runner = PipelineRunner::new();
        if let Some(seconds) = config.runner.hook_timeout_seconds {
            runner = runner.with_hook_timeout(Duration::from_secs(seconds));
        }

        Self {
            config: config.clone(),
            action: EngineAction::new(engine),
            hooks: PhaseHooks::new(),
            runner,
        }
    }

    /// Hooks run around each build.
    pub fn hooks(&self) -> &PhaseHooks<AssetBundleBuild> {
        &self.hooks
    }

    /// Mutable access for registering hooks.
    pub fn hooks_mut(&mut self) -> &mut PhaseHooks<AssetBundleBuild> {
        &mut self.hooks
    }

    /// Absolute output path for `target`.
    pub fn output_path(&self, target: BuildTarget) -> Result<PathBuf, BuildError> {
        let directory = output_directory(target).ok_or(BuildError::UnsupportedTarget {
            target,
            operation: BuildOperation::AssetBundle,
        })?;

        Ok(self
            .config
            .project
            .root
            .join(&self.config.asset_bundle.output_root)
            .join(directory))
    }

    /// Resolves the context of a build for `target` without side effects.
    pub fn context(&self, target: BuildTarget) -> Result<BuildContext<AssetBundleBuild>, BuildError> {
        let output_path = self.output_path(target)?;
        let options = AssetBundleOptions::resolve(&self.config.asset_bundle, &self.config.flags);
        Ok(BuildContext::new(target, output_path, options))
    }

    /// Builds asset bundles for `target`.
    ///
    /// An unsupported target fails before any hook runs or any directory is
    /// created. A failed engine run is returned as [`BuildResult::Failure`].
    pub async fn execute(
        &self,
        target: BuildTarget,
    ) -> Result<BuildResult<EngineReport>, BuildError> {
        let context = self.context(target)?;

        info!(
            build_id = %context.build_id,
            target = %target,
            compression = %context.options.compression,
            force_rebuild = context.options.force_rebuild,
            development = context.options.development,
            "Building asset bundles"
        );

        Ok(self
            .runner
            .run_with::<AssetBundleBuild>(&self.action, &self.hooks, context)
            .await?)
    }
}

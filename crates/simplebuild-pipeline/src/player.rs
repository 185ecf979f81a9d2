//! Player pipeline.
//!
//! Only the mobile targets produce players. The location layout is
//! `<root>/<output_root>/<Target>/<development|production>/<product><ext>`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use simplebuild_core::config::{AppConfig, BuildFlags};
use simplebuild_core::types::{BuildOperation, BuildTarget, Phase, TargetGroup};
use simplebuild_hooks::{BuildContext, BuildKind, BuildResult, PhaseHooks, PipelineRunner};

use crate::engine::{BuildEngine, EngineAction, EngineReport};
use crate::error::BuildError;

/// Player compilation.
#[derive(Debug, Clone)]
pub struct PlayerBuild;

impl BuildKind for PlayerBuild {
    type Options = PlayerOptions;
    type Report = EngineReport;

    const OPERATION: BuildOperation = BuildOperation::Player;
    const PRE_PHASE: Phase = Phase::PreBuildPlayer;
    const POST_PHASE: Phase = Phase::PostBuildPlayer;
}

/// Options passed to the player engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerOptions {
    /// Platform group the player is compiled for.
    pub target_group: TargetGroup,
    /// Where the player is written.
    pub location: PathBuf,
    /// Scenes in build order.
    pub scenes: Vec<String>,
    /// Development build, from `BUILD_DEVELOPMENT` (on unless `"false"`).
    pub development: bool,
    /// Auto-connect the profiler; only set on development builds.
    pub connect_with_profiler: bool,
    /// Allow script debugging; only set on development builds.
    pub allow_debugging: bool,
    /// Append to an existing Xcode project instead of replacing it.
    pub accept_external_modifications: bool,
    /// Compress the player data with LZ4.
    pub compress_with_lz4: bool,
}

impl PlayerOptions {
    /// Derives the player options for `target` from configuration and flags.
    pub fn resolve(
        target: BuildTarget,
        group: TargetGroup,
        location: PathBuf,
        config: &AppConfig,
    ) -> Self {
        let flags: &BuildFlags = &config.flags;
        let development = flags.player_development();

        Self {
            target_group: group,
            location,
            scenes: config.project.scenes.clone(),
            development,
            connect_with_profiler: development && flags.connect_with_profiler(),
            allow_debugging: development && flags.allow_debugging(),
            accept_external_modifications: development
                && target == BuildTarget::Ios
                && !flags.clean(),
            compress_with_lz4: config.player.compress_with_lz4,
        }
    }
}

/// Target group players for `target` are built in, `None` when unsupported.
pub fn target_group(target: BuildTarget) -> Option<TargetGroup> {
    match target {
        BuildTarget::Ios => Some(TargetGroup::Ios),
        BuildTarget::Android => Some(TargetGroup::Android),
        _ => None,
    }
}

/// File extension of the player for `target`.
pub fn output_extension(target: BuildTarget) -> Option<&'static str> {
    match target {
        BuildTarget::Ios => Some(""),
        BuildTarget::Android => Some(".apk"),
        _ => None,
    }
}

/// Whether the location itself must exist before the build. iOS players are
/// directories; Android players are single files the editor creates.
pub fn should_create_directory(target: BuildTarget) -> bool {
    matches!(target, BuildTarget::Ios)
}

/// Player location under `root`.
pub fn location_path(
    root: &Path,
    target: BuildTarget,
    development: bool,
    product_name: &str,
    extension: &str,
) -> PathBuf {
    let variant = if development { "development" } else { "production" };
    root.join(target.editor_name())
        .join(variant)
        .join(format!("{product_name}{extension}"))
}

/// Runs player builds against a build engine.
#[derive(Debug)]
pub struct PlayerBuilder {
    config: AppConfig,
    action: EngineAction,
    hooks: PhaseHooks<PlayerBuild>,
    runner: PipelineRunner,
}

impl PlayerBuilder {
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

    /// Hooks registered for player builds.
    pub fn hooks(&self) -> &PhaseHooks<PlayerBuild> {
        &self.hooks
    }

    /// Mutable access for registering hooks.
    pub fn hooks_mut(&mut self) -> &mut PhaseHooks<PlayerBuild> {
        &mut self.hooks
    }

    /// Resolves the context of a build for `target` without side effects.
    pub fn context(&self, target: BuildTarget) -> Result<BuildContext<PlayerBuild>, BuildError> {
        let unsupported = BuildError::UnsupportedTarget {
            target,
            operation: BuildOperation::Player,
        };
        let (Some(group), Some(extension)) = (target_group(target), output_extension(target))
        else {
            return Err(unsupported);
        };

        let location = location_path(
            &self.config.project.root.join(&self.config.player.output_root),
            target,
            self.config.flags.player_development(),
            &self.config.project.product_name,
            extension,
        );
        let options = PlayerOptions::resolve(target, group, location.clone(), &self.config);

        Ok(BuildContext::new(target, location, options))
    }

    /// Builds a player for `target`.
    ///
    /// An unsupported target fails before any hook runs. A failed engine run
    /// is returned as [`BuildResult::Failure`].
    pub async fn execute(
        &self,
        target: BuildTarget,
    ) -> Result<BuildResult<EngineReport>, BuildError> {
        let context = self.context(target)?;

        info!(
            build_id = %context.build_id,
            target = %target,
            location = %context.output_path.display(),
            development = context.options.development,
            scenes = context.options.scenes.len(),
            "Building player"
        );

        Ok(self
            .runner
            .run_with::<PlayerBuild>(&self.action, &self.hooks, context)
            .await?)
    }
}

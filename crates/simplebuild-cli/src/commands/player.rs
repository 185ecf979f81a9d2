//! `player` command.

use tracing::info;

use simplebuild_core::config::AppConfig;
use simplebuild_core::error::AppError;
use simplebuild_core::types::BuildOperation;
use simplebuild_pipeline::PlayerBuilder;
use simplebuild_pipeline::loader::register_configured_hooks;

use super::BuildArgs;
use crate::output::OutputFormat;

/// Builds a player for the resolved target
pub async fn execute(
    args: &BuildArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    config.validate()?;
    let target = super::resolve_target(args.target.as_deref(), config)?;

    let mut builder = PlayerBuilder::new(config, super::engine(config, args.dry_run));
    let hooks = register_configured_hooks(config, builder.hooks_mut())?;
    info!(
        target = %target,
        hooks,
        development = config.flags.player_development(),
        dry_run = args.dry_run,
        "Running player build"
    );

    let result = builder.execute(target).await?;
    super::finish_build(BuildOperation::Player, target, result, format)
}

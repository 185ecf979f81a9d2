//! Hook inspection CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use simplebuild_core::config::AppConfig;
use simplebuild_core::error::AppError;
use simplebuild_hooks::{BuildKind, HookInfo, PhaseHooks};
use simplebuild_pipeline::loader::register_configured_hooks;
use simplebuild_pipeline::{AssetBundleBuild, PlayerBuild};

use crate::output::{self, OutputFormat};

/// Arguments for hook commands
#[derive(Debug, Args)]
pub struct HooksArgs {
    /// Hooks subcommand
    #[command(subcommand)]
    pub command: HooksCommand,
}

/// Hooks subcommands
#[derive(Debug, Subcommand)]
pub enum HooksCommand {
    /// List registered hooks per phase, in the order they run
    List,
}

/// A registered hook
#[derive(Debug, Serialize, Tabled)]
pub struct HookRow {
    #[tabled(rename = "Phase")]
    pub phase: String,
    #[tabled(rename = "Order")]
    pub order: i32,
    #[tabled(rename = "Name")]
    pub name: String,
    /// Configured command, or `(built-in)`
    #[tabled(rename = "Command")]
    pub command: String,
}

/// Execute hook commands
pub fn execute(args: &HooksArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        HooksCommand::List => {
            let rows = list(config)?;
            output::print_list(&rows, format);
        }
    }
    Ok(())
}

/// Registers the configured hooks exactly as a build would and describes
/// them in discovery order.
pub fn list(config: &AppConfig) -> Result<Vec<HookRow>, AppError> {
    let mut rows = describe::<AssetBundleBuild>(config)?
        .into_iter()
        .map(|info| row(config, info))
        .collect::<Vec<_>>();
    rows.extend(
        describe::<PlayerBuild>(config)?
            .into_iter()
            .map(|info| row(config, info)),
    );
    Ok(rows)
}

fn describe<B: BuildKind>(config: &AppConfig) -> Result<Vec<HookInfo>, AppError> {
    let mut hooks = PhaseHooks::<B>::new();
    register_configured_hooks(config, &mut hooks)?;
    Ok(hooks.describe())
}

fn row(config: &AppConfig, info: HookInfo) -> HookRow {
    let command = config
        .hooks
        .iter()
        .find(|h| h.phase == info.phase && h.name == info.name)
        .map(|h| {
            std::iter::once(h.command.as_str())
                .chain(h.args.iter().map(String::as_str))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_else(|| "(built-in)".to_string());

    HookRow {
        phase: info.phase.to_string(),
        order: info.order,
        name: info.name,
        command,
    }
}

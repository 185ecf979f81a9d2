//! CLI command definitions and dispatch.

pub mod asset_bundle;
pub mod config;
pub mod hooks;
pub mod player;
pub mod targets;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use simplebuild_core::config::AppConfig;
use simplebuild_core::error::AppError;
use simplebuild_core::types::{BuildOperation, BuildTarget};
use simplebuild_hooks::BuildResult;
use simplebuild_pipeline::{BuildEngine, DryRunEngine, EditorEngine, EngineReport};

use crate::output::{self, OutputFormat};

/// SimpleBuild: asset bundle and player builds with ordered hooks
#[derive(Debug, Parser)]
#[command(name = "simplebuild", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Package asset bundles
    AssetBundle(BuildArgs),
    /// Build a player
    Player(BuildArgs),
    /// List build targets and what they support
    Targets,
    /// Hook inspection
    Hooks(hooks::HooksArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

/// Arguments shared by the build commands
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Build target (e.g. `ios`, `android`, `standalone`); defaults to
    /// `project.active_target`
    #[arg(short, long)]
    pub target: Option<String>,

    /// Log the request instead of launching the editor
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::AssetBundle(args) => asset_bundle::execute(args, config, self.format).await,
            Commands::Player(args) => player::execute(args, config, self.format).await,
            Commands::Targets => targets::execute(self.format),
            Commands::Hooks(args) => hooks::execute(args, config, self.format),
            Commands::Config(args) => config::execute(args, config, &self.config, self.format),
        }
    }
}

/// Resolves the build target from the command line or the configured
/// active target.
pub fn resolve_target(arg: Option<&str>, config: &AppConfig) -> Result<BuildTarget, AppError> {
    match (arg, config.project.active_target) {
        (Some(raw), _) => raw.parse(),
        (None, Some(target)) => Ok(target),
        (None, None) => Err(AppError::validation(
            "No build target given: pass --target or set project.active_target",
        )),
    }
}

/// Selects the engine builds run against.
pub fn engine(config: &AppConfig, dry_run: bool) -> Arc<dyn BuildEngine> {
    if dry_run {
        Arc::new(DryRunEngine::new())
    } else {
        Arc::new(EditorEngine::from_config(config))
    }
}

/// One finished build, as printed by the build commands
#[derive(Debug, Serialize, Tabled)]
pub struct BuildSummary {
    /// Build operation
    #[tabled(rename = "Operation")]
    pub operation: String,
    /// Built target
    #[tabled(rename = "Target")]
    pub target: String,
    /// `success` or `failure`
    #[tabled(rename = "Status")]
    pub status: String,
    /// Output location
    #[tabled(rename = "Output")]
    pub output_path: String,
    /// Engine duration
    #[tabled(rename = "Duration (ms)")]
    pub duration_ms: String,
    /// Failure reason or output size
    #[tabled(rename = "Detail")]
    pub detail: String,
}

impl BuildSummary {
    /// Summarizes a build result.
    pub fn new(
        operation: BuildOperation,
        target: BuildTarget,
        result: &BuildResult<EngineReport>,
    ) -> Self {
        let (output_path, duration_ms, detail) = match result {
            BuildResult::Success(report) => (
                report.output_path.display().to_string(),
                report.duration_ms.to_string(),
                report
                    .output_size
                    .map(|size| format!("{size} bytes"))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            BuildResult::Failure { reason } => ("-".to_string(), "-".to_string(), reason.clone()),
        };

        Self {
            operation: operation.to_string(),
            target: target.to_string(),
            status: result.status().to_string(),
            output_path,
            duration_ms,
            detail,
        }
    }
}

/// Prints a build result and turns a failure into an error.
///
/// In JSON mode only the summary list is printed.
pub fn finish_build(
    operation: BuildOperation,
    target: BuildTarget,
    result: BuildResult<EngineReport>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let summary = BuildSummary::new(operation, target, &result);
    output::print_list(std::slice::from_ref(&summary), format);

    match result {
        BuildResult::Success(_) => {
            output::print_success(&format!("{operation} build for {target} succeeded"), format);
            Ok(())
        }
        BuildResult::Failure { reason } => {
            output::print_warning(&format!("{operation} build for {target} failed"), format);
            Err(AppError::build(reason))
        }
    }
}

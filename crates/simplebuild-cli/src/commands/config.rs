//! Configuration management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;

use simplebuild_core::config::AppConfig;
use simplebuild_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Validate the configuration
    Validate,
}

/// What `config validate` reports for a valid configuration
#[derive(Debug, Serialize)]
pub struct ConfigSummary {
    /// Configuration file that was loaded
    pub path: String,
    /// Editor project root
    pub project_root: String,
    /// Product name used for player file names
    pub product: String,
    /// Editor executable
    pub editor: String,
    /// Target used when `--target` is omitted
    pub active_target: Option<String>,
    /// Declared hooks, enabled or not
    pub hooks: usize,
    /// Whether build manifests are written
    pub manifest: bool,
}

impl ConfigSummary {
    fn new(config: &AppConfig, path: &str) -> Self {
        Self {
            path: path.to_string(),
            project_root: config.project.root.display().to_string(),
            product: config.project.product_name.clone(),
            editor: config.editor.executable.clone(),
            active_target: config.project.active_target.map(|t| t.to_string()),
            hooks: config.hooks.len(),
            manifest: config.manifest.enabled,
        }
    }
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => output::print_item(config, format),
        ConfigCommand::Validate => {
            if let Err(e) = config.validate() {
                output::print_error(&format!("Configuration invalid: {e}"));
                return Err(e);
            }
            output::print_success(&format!("Configuration '{config_path}' is valid"), format);
            output::print_item(&ConfigSummary::new(config, config_path), format);
        }
    }

    Ok(())
}

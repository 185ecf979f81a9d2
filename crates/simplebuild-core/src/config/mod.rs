//! Application configuration schemas.
//!
//! All configuration structs are deserialized from an optional TOML file via
//! the `config` crate, overlaid by `SIMPLEBUILD__SECTION__KEY` environment
//! variables. The `BUILD_*` CI flags are read separately into
//! [`BuildFlags`].

pub mod editor;
pub mod flags;
pub mod hooks;
pub mod logging;
pub mod project;
pub mod settings;

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use self::editor::EditorConfig;
use self::hooks::{HookConfig, ManifestConfig, RunnerConfig};
use self::logging::LoggingConfig;
use self::project::ProjectConfig;
use self::settings::{AssetBundleConfig, PlayerConfig};

pub use self::flags::BuildFlags;

use crate::error::AppError;

/// Prefix for configuration overrides taken from the environment.
pub const ENV_PREFIX: &str = "SIMPLEBUILD";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Project layout.
    pub project: ProjectConfig,
    /// Editor launch settings.
    pub editor: EditorConfig,
    /// Asset bundle packaging settings.
    pub asset_bundle: AssetBundleConfig,
    /// Player build settings.
    pub player: PlayerConfig,
    /// Build manifest writer.
    pub manifest: ManifestConfig,
    /// Pipeline runner settings.
    pub runner: RunnerConfig,
    /// Command hooks.
    pub hooks: Vec<HookConfig>,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// `BUILD_*` flags captured at load time.
    #[serde(skip)]
    pub flags: BuildFlags,
}

impl AppConfig {
    /// Load configuration from a TOML file (missing files are allowed), the
    /// `SIMPLEBUILD__*` environment overlay, and the `BUILD_*` flags.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from(Path::new(path)).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let mut app: AppConfig = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        app.flags = BuildFlags::from_env()?;

        Ok(app)
    }

    /// Checks invariants that deserialization alone cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.project.product_name.trim().is_empty() {
            return Err(AppError::validation("project.product_name must not be empty"));
        }
        if self.editor.executable.trim().is_empty() {
            return Err(AppError::validation("editor.executable must not be empty"));
        }
        if self.editor.timeout_seconds == 0 {
            return Err(AppError::validation("editor.timeout_seconds must be positive"));
        }
        if self.asset_bundle.output_root.trim().is_empty() {
            return Err(AppError::validation("asset_bundle.output_root must not be empty"));
        }
        if self.player.output_root.trim().is_empty() {
            return Err(AppError::validation("player.output_root must not be empty"));
        }

        let mut seen = HashSet::new();
        for hook in &self.hooks {
            if hook.name.trim().is_empty() {
                return Err(AppError::validation("hook name must not be empty"));
            }
            if hook.command.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "hook '{}' has an empty command",
                    hook.name
                )));
            }
            if !seen.insert((hook.phase, hook.name.as_str())) {
                return Err(AppError::validation(format!(
                    "hook '{}' is declared twice for phase {}",
                    hook.name, hook.phase
                )));
            }
        }

        Ok(())
    }
}

//! Editor (external build engine) configuration.

use serde::{Deserialize, Serialize};

/// How the editor is launched in batch mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Path or command name of the editor executable.
    #[serde(default = "default_executable")]
    pub executable: String,
    /// Maximum time a single editor invocation may run.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Editor log file; `None` sends the log to stdout.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Static method executed to package asset bundles.
    #[serde(default = "default_asset_bundle_method")]
    pub asset_bundle_method: String,
    /// Static method executed to build a player.
    #[serde(default = "default_player_method")]
    pub player_method: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            timeout_seconds: default_timeout(),
            log_file: None,
            asset_bundle_method: default_asset_bundle_method(),
            player_method: default_player_method(),
        }
    }
}

fn default_executable() -> String {
    "Unity".to_string()
}

fn default_timeout() -> u64 {
    7200
}

fn default_asset_bundle_method() -> String {
    "SimpleBuild.BuildAssetBundle.Run".to_string()
}

fn default_player_method() -> String {
    "SimpleBuild.BuildPlayer.Run".to_string()
}

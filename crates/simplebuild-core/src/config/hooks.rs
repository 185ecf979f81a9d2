//! Hook and runner configuration.

use serde::{Deserialize, Serialize};

use crate::types::Phase;

/// An external command registered as a hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookConfig {
    /// Unique hook name within its phase.
    pub name: String,
    /// Phase the hook runs in.
    pub phase: Phase,
    /// Execution order (lower = runs first).
    #[serde(default)]
    pub order: i32,
    /// Command to execute.
    pub command: String,
    /// Arguments; `{target}`, `{output_path}`, `{build_id}`, `{phase}` and
    /// `{result}` are substituted.
    #[serde(default)]
    pub args: Vec<String>,
    /// Whether a post hook still runs after a failed build.
    #[serde(default = "default_true")]
    pub run_on_failure: bool,
    /// Per-invocation timeout.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    /// Disabled hooks are not registered.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Build manifest writer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Whether a manifest is written after each build.
    #[serde(default)]
    pub enabled: bool,
    /// Manifest file name, placed next to the build output.
    #[serde(default = "default_manifest_file")]
    pub file_name: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            file_name: default_manifest_file(),
        }
    }
}

/// Pipeline runner settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Upper bound for a single hook invocation.
    #[serde(default)]
    pub hook_timeout_seconds: Option<u64>,
}

fn default_manifest_file() -> String {
    "build-manifest.json".to_string()
}

fn default_true() -> bool {
    true
}

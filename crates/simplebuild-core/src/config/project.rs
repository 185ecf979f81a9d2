//! Project layout configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::BuildTarget;

/// Settings describing the game project being built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project root directory; every output path is resolved against it.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Product name used as the player binary name.
    #[serde(default = "default_product_name")]
    pub product_name: String,
    /// Scenes included in player builds, in build order.
    #[serde(default)]
    pub scenes: Vec<String>,
    /// Target used when a build is requested without an explicit target.
    #[serde(default)]
    pub active_target: Option<BuildTarget>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            product_name: default_product_name(),
            scenes: Vec::new(),
            active_target: None,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_product_name() -> String {
    "Game".to_string()
}

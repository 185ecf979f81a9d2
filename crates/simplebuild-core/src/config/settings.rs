//! Asset bundle and player build settings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Asset bundle compression mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    /// Chunk-based (LZ4) compression.
    #[default]
    ChunkBased,
    /// Whole-archive LZMA compression.
    Lzma,
    /// No compression.
    Uncompressed,
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChunkBased => write!(f, "chunk_based"),
            Self::Lzma => write!(f, "lzma"),
            Self::Uncompressed => write!(f, "uncompressed"),
        }
    }
}

/// Asset bundle packaging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetBundleConfig {
    /// Output root, relative to the project root.
    #[serde(default = "default_asset_bundle_root")]
    pub output_root: String,
    /// Compression mode.
    #[serde(default)]
    pub compression: Compression,
    /// Whether type tree changes are ignored for incremental builds.
    #[serde(default = "default_true")]
    pub ignore_type_tree_changes: bool,
    /// Whether bundles are rebuilt from scratch. `BUILD_ASSETBUNDLE_FORCE_REBUILD=false`
    /// overrides this to off.
    #[serde(default)]
    pub force_rebuild: bool,
}

impl Default for AssetBundleConfig {
    fn default() -> Self {
        Self {
            output_root: default_asset_bundle_root(),
            compression: Compression::default(),
            ignore_type_tree_changes: true,
            force_rebuild: false,
        }
    }
}

/// Player build settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Output root, relative to the project root.
    #[serde(default = "default_player_root")]
    pub output_root: String,
    /// Whether players are compressed with LZ4.
    #[serde(default = "default_true")]
    pub compress_with_lz4: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            output_root: default_player_root(),
            compress_with_lz4: true,
        }
    }
}

fn default_asset_bundle_root() -> String {
    "Assets/AssetBundles".to_string()
}

fn default_player_root() -> String {
    "Build".to_string()
}

fn default_true() -> bool {
    true
}

//! Pipeline phases at which hooks are invoked.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of build a pipeline performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildOperation {
    /// Packaging asset bundles.
    AssetBundle,
    /// Producing a platform player binary.
    Player,
}

impl BuildOperation {
    /// Returns the string name of this operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssetBundle => "asset_bundle",
            Self::Player => "player",
        }
    }
}

impl fmt::Display for BuildOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One of the four fixed hook invocation points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Before asset bundles are packaged.
    PreAssetBundle,
    /// After asset bundles are packaged.
    PostAssetBundle,
    /// Before a player is built.
    PreBuildPlayer,
    /// After a player is built.
    PostBuildPlayer,
}

impl Phase {
    /// Every phase, in pipeline order.
    pub const ALL: [Phase; 4] = [
        Self::PreAssetBundle,
        Self::PostAssetBundle,
        Self::PreBuildPlayer,
        Self::PostBuildPlayer,
    ];

    /// Returns the string name of this phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreAssetBundle => "pre_asset_bundle",
            Self::PostAssetBundle => "post_asset_bundle",
            Self::PreBuildPlayer => "pre_build_player",
            Self::PostBuildPlayer => "post_build_player",
        }
    }

    /// Returns whether hooks in this phase run before the build action.
    pub fn is_pre(&self) -> bool {
        matches!(self, Self::PreAssetBundle | Self::PreBuildPlayer)
    }

    /// Returns the build operation this phase belongs to.
    pub fn operation(&self) -> BuildOperation {
        match self {
            Self::PreAssetBundle | Self::PostAssetBundle => BuildOperation::AssetBundle,
            Self::PreBuildPlayer | Self::PostBuildPlayer => BuildOperation::Player,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

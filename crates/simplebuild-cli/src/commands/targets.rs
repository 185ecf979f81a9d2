//! `targets` command.

use serde::Serialize;
use tabled::Tabled;

use simplebuild_core::error::AppError;
use simplebuild_core::types::BuildTarget;
use simplebuild_pipeline::{asset_bundle, player};

use crate::output::{self, OutputFormat};

const UNSUPPORTED: &str = "unsupported";

/// What each target supports
#[derive(Debug, Serialize, Tabled)]
pub struct TargetRow {
    #[tabled(rename = "Target")]
    pub target: String,
    #[tabled(rename = "Editor Name")]
    pub editor_name: String,
    #[tabled(rename = "Group")]
    pub group: String,
    /// Asset bundle output directory
    #[tabled(rename = "Asset Bundles")]
    pub asset_bundle_dir: String,
    /// Player target group
    #[tabled(rename = "Player Group")]
    pub player_group: String,
    /// Player file extension
    #[tabled(rename = "Player Ext")]
    pub player_extension: String,
}

impl TargetRow {
    /// Describes one target.
    pub fn new(target: BuildTarget) -> Self {
        Self {
            target: target.as_str().to_string(),
            editor_name: target.editor_name().to_string(),
            group: target.group().to_string(),
            asset_bundle_dir: asset_bundle::output_directory(target)
                .unwrap_or(UNSUPPORTED)
                .to_string(),
            player_group: player::target_group(target)
                .map(|g| g.to_string())
                .unwrap_or_else(|| UNSUPPORTED.to_string()),
            player_extension: match player::output_extension(target) {
                Some("") => "(none)".to_string(),
                Some(ext) => ext.to_string(),
                None => UNSUPPORTED.to_string(),
            },
        }
    }
}

/// Lists every target with its asset bundle and player support
pub fn execute(format: OutputFormat) -> Result<(), AppError> {
    let rows: Vec<TargetRow> = BuildTarget::ALL.into_iter().map(TargetRow::new).collect();
    output::print_list(&rows, format);
    Ok(())
}

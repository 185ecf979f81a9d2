//! Engine that only logs what would be built.

use std::time::Instant;

use async_trait::async_trait;
use tracing::info;

use simplebuild_hooks::{BuildContext, BuildKind};

use super::{BuildEngine, EngineError, EngineReport};
use crate::asset_bundle::AssetBundleBuild;
use crate::player::PlayerBuild;

/// Reports success for every request without launching the editor.
#[derive(Debug, Clone, Default)]
pub struct DryRunEngine;

impl DryRunEngine {
    /// Creates a dry-run engine.
    pub fn new() -> Self {
        Self
    }

    fn report<B: BuildKind>(context: &BuildContext<B>) -> EngineReport {
        let start = Instant::now();
        info!(
            build_id = %context.build_id,
            operation = %B::OPERATION,
            target = %context.target,
            output_path = %context.output_path.display(),
            options = ?context.options,
            "Dry run, skipping editor invocation"
        );

        EngineReport {
            output_path: context.output_path.clone(),
            duration_ms: start.elapsed().as_millis() as u64,
            exit_code: None,
            output_size: None,
        }
    }
}

#[async_trait]
impl BuildEngine for DryRunEngine {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn build_asset_bundles(
        &self,
        context: &BuildContext<AssetBundleBuild>,
    ) -> Result<EngineReport, EngineError> {
        Ok(Self::report(context))
    }

    async fn build_player(
        &self,
        context: &BuildContext<PlayerBuild>,
    ) -> Result<EngineReport, EngineError> {
        Ok(Self::report(context))
    }
}

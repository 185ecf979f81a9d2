//! Shared test helpers for integration tests.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use simplebuild_core::config::{AppConfig, BuildFlags};
use simplebuild_hooks::{
    BuildContext, BuildKind, HookError, OrderedCallback, PostContext, PostprocessHook,
    PreprocessHook,
};
use simplebuild_pipeline::{
    AssetBundleBuild, AssetBundleOptions, BuildEngine, EngineError, EngineReport, PlayerBuild,
    PlayerOptions,
};

/// Ordered log of everything that happened during a run.
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// A throwaway project directory with its configuration.
pub struct TestProject {
    /// Keeps the directory alive for the test.
    pub dir: TempDir,
    /// Configuration rooted at `dir`.
    pub config: AppConfig,
}

impl TestProject {
    /// Creates a project with default settings and no `BUILD_*` flags.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut config = AppConfig::default();
        config.project.root = dir.path().to_path_buf();
        config.project.product_name = "Puzzle".to_string();
        config.project.scenes = vec!["Assets/Scenes/Title.unity".to_string()];
        Self { dir, config }
    }

    /// Applies `BUILD_*` flags as if they were set in the environment.
    pub fn with_flags(mut self, vars: &[(&str, &str)]) -> Self {
        self.config.flags =
            BuildFlags::from_vars(vars.iter().copied()).expect("Failed to parse flags");
        self
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

/// What the engine was asked to build.
#[derive(Debug, Clone)]
pub enum EngineCall {
    AssetBundles(BuildContext<AssetBundleBuild>),
    Player(BuildContext<PlayerBuild>),
}

/// Engine that records requests instead of launching the editor.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    events: EventLog,
    calls: Mutex<Vec<EngineCall>>,
    fail_with: Option<String>,
}

impl RecordingEngine {
    /// Records into `events` and reports success.
    pub fn new(events: EventLog) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }

    /// Records into `events` and fails every build with `reason`.
    pub fn failing(events: EventLog, reason: &str) -> Self {
        Self {
            events,
            fail_with: Some(reason.to_string()),
            ..Default::default()
        }
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    fn finish<B: BuildKind>(&self, context: &BuildContext<B>) -> Result<EngineReport, EngineError> {
        self.events.lock().unwrap().push("engine".to_string());

        match &self.fail_with {
            Some(reason) => Err(EngineError::ProcessFailed {
                code: 1,
                output: reason.clone(),
            }),
            None => Ok(EngineReport {
                output_path: context.output_path.clone(),
                duration_ms: 1,
                exit_code: Some(0),
                output_size: Some(42),
            }),
        }
    }
}

#[async_trait]
impl BuildEngine for RecordingEngine {
    fn name(&self) -> &str {
        "recording"
    }

    async fn build_asset_bundles(
        &self,
        context: &BuildContext<AssetBundleBuild>,
    ) -> Result<EngineReport, EngineError> {
        self.calls
            .lock()
            .unwrap()
            .push(EngineCall::AssetBundles(context.clone()));
        self.finish(context)
    }

    async fn build_player(
        &self,
        context: &BuildContext<PlayerBuild>,
    ) -> Result<EngineReport, EngineError> {
        self.calls
            .lock()
            .unwrap()
            .push(EngineCall::Player(context.clone()));
        self.finish(context)
    }
}

/// Hook that appends `name` to the event log, optionally failing.
pub struct RecordingHook {
    name: String,
    order: i32,
    events: EventLog,
    fail: bool,
}

impl RecordingHook {
    pub fn new(name: &str, order: i32, events: &EventLog) -> Self {
        Self {
            name: name.to_string(),
            order,
            events: events.clone(),
            fail: false,
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn record(&self, suffix: &str) -> Result<(), HookError> {
        self.events
            .lock()
            .unwrap()
            .push(format!("{}{}", self.name, suffix));
        if self.fail {
            return Err(HookError::failed(format!("{} refused", self.name)));
        }
        Ok(())
    }
}

impl OrderedCallback for RecordingHook {
    fn name(&self) -> &str {
        &self.name
    }

    fn order(&self) -> i32 {
        self.order
    }
}

#[async_trait]
impl PreprocessHook<AssetBundleBuild> for RecordingHook {
    async fn preprocess(&self, _context: &BuildContext<AssetBundleBuild>) -> Result<(), HookError> {
        self.record("")
    }
}

#[async_trait]
impl PostprocessHook<AssetBundleBuild> for RecordingHook {
    async fn postprocess(&self, context: &PostContext<AssetBundleBuild>) -> Result<(), HookError> {
        self.record(&format!(":{}", context.result.status()))
    }
}

#[async_trait]
impl PreprocessHook<PlayerBuild> for RecordingHook {
    async fn preprocess(&self, _context: &BuildContext<PlayerBuild>) -> Result<(), HookError> {
        self.record("")
    }
}

#[async_trait]
impl PostprocessHook<PlayerBuild> for RecordingHook {
    async fn postprocess(&self, context: &PostContext<PlayerBuild>) -> Result<(), HookError> {
        self.record(&format!(":{}", context.result.status()))
    }
}

/// Returns the recorded events.
pub fn events(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Unwraps asset bundle options from a recorded call.
pub fn asset_bundle_options(call: &EngineCall) -> &AssetBundleOptions {
    match call {
        EngineCall::AssetBundles(ctx) => &ctx.options,
        EngineCall::Player(_) => panic!("expected an asset bundle call"),
    }
}

/// Unwraps player options from a recorded call.
pub fn player_options(call: &EngineCall) -> &PlayerOptions {
    match call {
        EngineCall::Player(ctx) => &ctx.options,
        EngineCall::AssetBundles(_) => panic!("expected a player call"),
    }
}

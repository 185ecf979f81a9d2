//! Integration tests for the asset bundle pipeline.

use std::sync::Arc;

use simplebuild_core::config::settings::Compression;
use simplebuild_core::types::{BuildTarget, Phase};
use simplebuild_hooks::{BuildResult, PipelineError, Stage};
use simplebuild_pipeline::{AssetBundleBuilder, BuildError};

use crate::helpers::{self, EventLog, RecordingEngine, RecordingHook, TestProject};

#[tokio::test]
async fn test_hooks_run_in_order_around_build() {
    let project = TestProject::new();
    let log = EventLog::default();
    let engine = Arc::new(RecordingEngine::new(log.clone()));

    let mut builder = AssetBundleBuilder::new(&project.config, engine.clone());
    let hooks = builder.hooks_mut();
    hooks.add_pre(RecordingHook::new("late", 10, &log)).unwrap();
    hooks.add_pre(RecordingHook::new("early", 5, &log)).unwrap();
    hooks.add_post(RecordingHook::new("upload", 0, &log)).unwrap();

    let result = builder.execute(BuildTarget::Android).await.unwrap();

    assert!(result.is_success());
    assert_eq!(
        helpers::events(&log),
        vec!["early", "late", "engine", "upload:success"]
    );

    let expected = project.root().join("Assets/AssetBundles/Android");
    assert!(expected.is_dir());
    assert_eq!(result.report().unwrap().output_path, expected);

    let calls = engine.calls();
    assert_eq!(calls.len(), 1);
    let options = helpers::asset_bundle_options(&calls[0]);
    assert_eq!(options.compression, Compression::ChunkBased);
    assert!(options.ignore_type_tree_changes);
    assert!(!options.force_rebuild);
    assert!(!options.development);
}

#[tokio::test]
async fn test_standalone_targets_share_directory() {
    let project = TestProject::new();
    let log = EventLog::default();
    let builder = AssetBundleBuilder::new(&project.config, Arc::new(RecordingEngine::new(log)));

    for target in [BuildTarget::StandaloneWindows64, BuildTarget::StandaloneOsx] {
        let result = builder.execute(target).await.unwrap();
        assert_eq!(
            result.report().unwrap().output_path,
            project.root().join("Assets/AssetBundles/Standalone")
        );
    }
}

#[tokio::test]
async fn test_unsupported_target_runs_nothing() {
    let project = TestProject::new();
    let log = EventLog::default();
    let engine = Arc::new(RecordingEngine::new(log.clone()));

    let mut builder = AssetBundleBuilder::new(&project.config, engine.clone());
    builder
        .hooks_mut()
        .add_pre(RecordingHook::new("stamp", 0, &log))
        .unwrap();

    let err = builder.execute(BuildTarget::WebGl).await.unwrap_err();

    assert!(matches!(err, BuildError::UnsupportedTarget { .. }));
    assert!(helpers::events(&log).is_empty());
    assert!(engine.calls().is_empty());
    assert!(!project.root().join("Assets").exists());
}

#[tokio::test]
async fn test_failing_pre_hook_aborts_before_build() {
    let project = TestProject::new();
    let log = EventLog::default();
    let engine = Arc::new(RecordingEngine::new(log.clone()));

    let mut builder = AssetBundleBuilder::new(&project.config, engine.clone());
    let hooks = builder.hooks_mut();
    hooks.add_pre(RecordingHook::new("first", 1, &log)).unwrap();
    hooks
        .add_pre(RecordingHook::new("broken", 2, &log).failing())
        .unwrap();
    hooks.add_pre(RecordingHook::new("never", 3, &log)).unwrap();
    hooks.add_post(RecordingHook::new("post", 0, &log)).unwrap();

    let err = builder.execute(BuildTarget::Ios).await.unwrap_err();

    match err {
        BuildError::Pipeline(PipelineError::HookInvocation {
            phase,
            stage,
            hook,
            order,
            ..
        }) => {
            assert_eq!(phase, Phase::PreAssetBundle);
            assert_eq!(stage, Stage::PreHook);
            assert_eq!(hook, "broken");
            assert_eq!(order, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(helpers::events(&log), vec!["first", "broken"]);
    assert!(engine.calls().is_empty());
    assert!(!project.root().join("Assets").exists());
}

#[tokio::test]
async fn test_failed_build_still_runs_post_hooks() {
    let project = TestProject::new();
    let log = EventLog::default();
    let engine = Arc::new(RecordingEngine::failing(log.clone(), "shader compile error"));

    let mut builder = AssetBundleBuilder::new(&project.config, engine);
    builder
        .hooks_mut()
        .add_post(RecordingHook::new("report", 0, &log))
        .unwrap();

    let result = builder.execute(BuildTarget::Ios).await.unwrap();

    match &result {
        BuildResult::Failure { reason } => assert!(reason.contains("shader compile error")),
        BuildResult::Success(_) => panic!("expected a failure"),
    }
    assert_eq!(helpers::events(&log), vec!["engine", "report:failure"]);
}

#[tokio::test]
async fn test_force_rebuild_and_development_flags() {
    let mut project = TestProject::new().with_flags(&[("BUILD_DEVELOPMENT", "true")]);
    project.config.asset_bundle.force_rebuild = true;
    project.config.asset_bundle.compression = Compression::Lzma;

    let log = EventLog::default();
    let engine = Arc::new(RecordingEngine::new(log));
    let builder = AssetBundleBuilder::new(&project.config, engine.clone());
    builder.execute(BuildTarget::Ios).await.unwrap();

    let calls = engine.calls();
    let options = helpers::asset_bundle_options(&calls[0]);
    assert!(options.force_rebuild);
    assert!(options.development);
    assert_eq!(options.compression, Compression::Lzma);

    let mut project = project.with_flags(&[("BUILD_ASSETBUNDLE_FORCE_REBUILD", "false")]);
    project.config.asset_bundle.force_rebuild = true;
    let engine = Arc::new(RecordingEngine::new(EventLog::default()));
    let builder = AssetBundleBuilder::new(&project.config, engine.clone());
    builder.execute(BuildTarget::Ios).await.unwrap();

    let calls = engine.calls();
    let options = helpers::asset_bundle_options(&calls[0]);
    assert!(!options.force_rebuild);
    assert!(!options.development);
}

#[tokio::test]
async fn test_repeated_runs_invoke_hooks_once_each() {
    let project = TestProject::new();
    let log = EventLog::default();
    let mut builder =
        AssetBundleBuilder::new(&project.config, Arc::new(RecordingEngine::new(log.clone())));
    builder
        .hooks_mut()
        .add_pre(RecordingHook::new("stamp", 0, &log))
        .unwrap();

    builder.execute(BuildTarget::Ios).await.unwrap();
    builder.execute(BuildTarget::Android).await.unwrap();

    assert_eq!(
        helpers::events(&log),
        vec!["stamp", "engine", "stamp", "engine"]
    );
}

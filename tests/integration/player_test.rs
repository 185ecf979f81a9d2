//! Integration tests for the player pipeline.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use simplebuild_core::types::{BuildTarget, Phase, TargetGroup};
use simplebuild_hooks::prelude::*;
use simplebuild_hooks::{PipelineError, Stage};
use simplebuild_pipeline::{BuildError, PlayerBuild, PlayerBuilder};

use crate::helpers::{self, EventLog, RecordingEngine, RecordingHook, TestProject};

#[tokio::test]
async fn test_android_development_player() {
    let project = TestProject::new();
    let log = EventLog::default();
    let engine = Arc::new(RecordingEngine::new(log.clone()));

    let mut builder = PlayerBuilder::new(&project.config, engine.clone());
    builder
        .hooks_mut()
        .add_pre(RecordingHook::new("bump-version", 0, &log))
        .unwrap();
    builder
        .hooks_mut()
        .add_post(RecordingHook::new("upload", 0, &log))
        .unwrap();

    let result = builder.execute(BuildTarget::Android).await.unwrap();

    let location = project
        .root()
        .join("Build/Android/development/Puzzle.apk");
    assert_eq!(result.report().unwrap().output_path, location);
    assert_eq!(
        helpers::events(&log),
        vec!["bump-version", "engine", "upload:success"]
    );
    // The editor creates the .apk itself.
    assert!(!project.root().join("Build").exists());

    let calls = engine.calls();
    let options = helpers::player_options(&calls[0]);
    assert_eq!(options.target_group, TargetGroup::Android);
    assert_eq!(options.location, location);
    assert_eq!(options.scenes, vec!["Assets/Scenes/Title.unity"]);
    assert!(options.development);
    assert!(options.connect_with_profiler);
    assert!(options.allow_debugging);
    assert!(!options.accept_external_modifications);
    assert!(options.compress_with_lz4);
}

#[tokio::test]
async fn test_ios_production_player() {
    let project = TestProject::new().with_flags(&[("BUILD_DEVELOPMENT", "false")]);
    let engine = Arc::new(RecordingEngine::new(EventLog::default()));
    let builder = PlayerBuilder::new(&project.config, engine.clone());

    let result = builder.execute(BuildTarget::Ios).await.unwrap();

    let location = project.root().join("Build/iOS/production/Puzzle");
    assert!(location.is_dir());
    assert_eq!(result.report().unwrap().output_path, location);

    let calls = engine.calls();
    let options = helpers::player_options(&calls[0]);
    assert_eq!(options.target_group, TargetGroup::Ios);
    assert!(!options.development);
    assert!(!options.connect_with_profiler);
    assert!(!options.allow_debugging);
    assert!(!options.accept_external_modifications);
}

#[tokio::test]
async fn test_ios_append_unless_clean() {
    let project = TestProject::new();
    let engine = Arc::new(RecordingEngine::new(EventLog::default()));
    PlayerBuilder::new(&project.config, engine.clone())
        .execute(BuildTarget::Ios)
        .await
        .unwrap();
    assert!(helpers::player_options(&engine.calls()[0]).accept_external_modifications);

    let project = TestProject::new().with_flags(&[("BUILD_CLEAN", "true")]);
    let engine = Arc::new(RecordingEngine::new(EventLog::default()));
    PlayerBuilder::new(&project.config, engine.clone())
        .execute(BuildTarget::Ios)
        .await
        .unwrap();
    assert!(!helpers::player_options(&engine.calls()[0]).accept_external_modifications);
}

#[tokio::test]
async fn test_standalone_player_is_unsupported() {
    let project = TestProject::new();
    let log = EventLog::default();
    let engine = Arc::new(RecordingEngine::new(log.clone()));

    let mut builder = PlayerBuilder::new(&project.config, engine.clone());
    builder
        .hooks_mut()
        .add_pre(RecordingHook::new("stamp", 0, &log))
        .unwrap();

    for target in [BuildTarget::StandaloneWindows64, BuildTarget::WebGl] {
        let err = builder.execute(target).await.unwrap_err();
        assert!(matches!(err, BuildError::UnsupportedTarget { .. }));
    }
    assert!(helpers::events(&log).is_empty());
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn test_success_only_post_hook_skipped_on_failure() {
    let project = TestProject::new();
    let log = EventLog::default();
    let engine = Arc::new(RecordingEngine::failing(log.clone(), "signing failed"));
    let uploaded = Arc::new(AtomicBool::new(false));

    let mut builder = PlayerBuilder::new(&project.config, engine);
    let flag = uploaded.clone();
    builder
        .hooks_mut()
        .add_post(
            FnHook::new("upload", 0, move |_ctx: &PostContext<PlayerBuild>| {
                flag.store(true, Ordering::SeqCst);
                Ok(())
            })
            .success_only(),
        )
        .unwrap();
    builder
        .hooks_mut()
        .add_post(RecordingHook::new("notify", 1, &log))
        .unwrap();

    let result = builder.execute(BuildTarget::Android).await.unwrap();

    assert!(result.is_failure());
    assert!(!uploaded.load(Ordering::SeqCst));
    assert_eq!(helpers::events(&log), vec!["engine", "notify:failure"]);
}

#[tokio::test]
async fn test_failing_post_hook_is_reported() {
    let project = TestProject::new();
    let log = EventLog::default();
    let mut builder =
        PlayerBuilder::new(&project.config, Arc::new(RecordingEngine::new(log.clone())));
    builder
        .hooks_mut()
        .add_post(RecordingHook::new("archive", 7, &log).failing())
        .unwrap();
    builder
        .hooks_mut()
        .add_post(RecordingHook::new("after", 8, &log))
        .unwrap();

    let err = builder.execute(BuildTarget::Android).await.unwrap_err();

    match err {
        BuildError::Pipeline(PipelineError::HookInvocation {
            phase,
            stage,
            hook,
            order,
            ..
        }) => {
            assert_eq!(phase, Phase::PostBuildPlayer);
            assert_eq!(stage, Stage::PostHook);
            assert_eq!(hook, "archive");
            assert_eq!(order, 7);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(helpers::events(&log), vec!["engine", "archive:success"]);
}

#[tokio::test]
async fn test_post_hook_failure_keeps_build_failure() {
    let project = TestProject::new();
    let log = EventLog::default();
    let mut builder = PlayerBuilder::new(
        &project.config,
        Arc::new(RecordingEngine::failing(log.clone(), "unsupported SDK")),
    );
    builder
        .hooks_mut()
        .add_post(RecordingHook::new("notify", 0, &log).failing())
        .unwrap();

    let err = builder.execute(BuildTarget::Android).await.unwrap_err();

    let pipeline = match err {
        BuildError::Pipeline(pipeline) => pipeline,
        other => panic!("unexpected error: {other}"),
    };
    assert_eq!(pipeline.hook_name(), "notify");
    assert!(
        pipeline
            .build_failure()
            .is_some_and(|reason| reason.contains("unsupported SDK"))
    );
    assert!(pipeline.to_string().contains("unsupported SDK"));
    assert_eq!(helpers::events(&log), vec!["engine", "notify:failure"]);
}

#[tokio::test]
async fn test_pre_hook_sees_resolved_context() {
    let project = TestProject::new();
    let expected = project.root().join("Build/Android/development/Puzzle.apk");
    let mut builder = PlayerBuilder::new(
        &project.config,
        Arc::new(RecordingEngine::new(EventLog::default())),
    );

    builder
        .hooks_mut()
        .add_pre(FnHook::new("check", 0, move |ctx: &BuildContext<PlayerBuild>| {
            if ctx.output_path != expected || ctx.target != BuildTarget::Android {
                return Err(HookError::failed("unexpected context"));
            }
            Ok(())
        }))
        .unwrap();

    assert!(builder.execute(BuildTarget::Android).await.unwrap().is_success());
}

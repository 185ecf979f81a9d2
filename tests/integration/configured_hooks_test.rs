//! Integration tests for hooks declared in configuration.

use std::sync::Arc;

use simplebuild_core::config::hooks::HookConfig;
use simplebuild_core::types::{BuildTarget, Phase};
use simplebuild_pipeline::builtin::BuildManifest;
use simplebuild_pipeline::loader::register_configured_hooks;
use simplebuild_pipeline::{AssetBundleBuilder, PlayerBuilder};

use crate::helpers::{EventLog, RecordingEngine, TestProject};

fn shell_hook(name: &str, phase: Phase, order: i32, script: &str) -> HookConfig {
    HookConfig {
        name: name.to_string(),
        phase,
        order,
        command: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string()],
        run_on_failure: true,
        timeout_seconds: Some(30),
        enabled: true,
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_command_hooks_run_in_declared_order() {
    let mut project = TestProject::new();
    let trace = project.root().join("trace.txt");
    let trace_path = trace.display().to_string();

    project.config.hooks = vec![
        shell_hook(
            "second",
            Phase::PreAssetBundle,
            20,
            &format!("echo second-{{target}} >> {trace_path}"),
        ),
        shell_hook(
            "first",
            Phase::PreAssetBundle,
            10,
            &format!("echo first-{{phase}} >> {trace_path}"),
        ),
        shell_hook(
            "done",
            Phase::PostAssetBundle,
            0,
            &format!("echo done-{{result}} >> {trace_path}"),
        ),
        shell_hook(
            "player-only",
            Phase::PreBuildPlayer,
            0,
            &format!("echo player >> {trace_path}"),
        ),
    ];

    let mut builder = AssetBundleBuilder::new(
        &project.config,
        Arc::new(RecordingEngine::new(EventLog::default())),
    );
    let registered = register_configured_hooks(&project.config, builder.hooks_mut()).unwrap();
    assert_eq!(registered, 3);

    let result = builder.execute(BuildTarget::Ios).await.unwrap();
    assert!(result.is_success());

    let lines: Vec<String> = std::fs::read_to_string(&trace)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    assert_eq!(
        lines,
        vec!["first-pre_asset_bundle", "second-iOS", "done-success"]
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_failing_command_hook_aborts_build() {
    let mut project = TestProject::new();
    project.config.hooks = vec![shell_hook(
        "gate",
        Phase::PreBuildPlayer,
        0,
        "echo 'version not bumped' >&2; exit 2",
    )];

    let engine = Arc::new(RecordingEngine::new(EventLog::default()));
    let mut builder = PlayerBuilder::new(&project.config, engine.clone());
    register_configured_hooks(&project.config, builder.hooks_mut()).unwrap();

    let err = builder.execute(BuildTarget::Android).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("'gate'"), "{message}");
    assert!(message.contains("version not bumped"), "{message}");
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn test_manifest_written_after_failed_build() {
    let mut project = TestProject::new();
    project.config.manifest.enabled = true;

    let engine = Arc::new(RecordingEngine::failing(EventLog::default(), "out of disk"));
    let mut builder = AssetBundleBuilder::new(&project.config, engine);
    register_configured_hooks(&project.config, builder.hooks_mut()).unwrap();

    let result = builder.execute(BuildTarget::Android).await.unwrap();
    assert!(result.is_failure());

    let path = project
        .root()
        .join("Assets/AssetBundles/Android/build-manifest.json");
    let manifest: BuildManifest = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
    assert_eq!(manifest.status, "failure");
    assert_eq!(manifest.target, BuildTarget::Android);
    assert!(
        manifest
            .failure_reason
            .as_deref()
            .unwrap()
            .contains("out of disk")
    );
    assert_eq!(manifest.options["compression"], "chunk_based");
}

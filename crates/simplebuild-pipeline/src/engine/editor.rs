//! Editor batch-mode engine.
//!
//! Launches the editor headless with `-executeMethod`, passing the resolved
//! request through `SIMPLEBUILD_*` environment variables, with timeout
//! management and output capturing.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{error, info, warn};

use simplebuild_core::config::AppConfig;
use simplebuild_core::types::BuildTarget;
use simplebuild_hooks::{BuildContext, BuildKind};

use super::{BuildEngine, EngineError, EngineReport, output_size};
use crate::asset_bundle::AssetBundleBuild;
use crate::player::PlayerBuild;

/// Maximum number of characters of engine output kept in errors.
const OUTPUT_TAIL_CHARS: usize = 2000;

/// Engine that runs the editor executable in batch mode.
#[derive(Debug, Clone)]
pub struct EditorEngine {
    /// Editor executable.
    executable: String,
    /// Project opened by the editor.
    project_root: PathBuf,
    /// Per-invocation limit.
    timeout: Duration,
    /// Editor log file, `None` for stdout.
    log_file: Option<String>,
    /// Method packaging asset bundles.
    asset_bundle_method: String,
    /// Method building players.
    player_method: String,
}

impl EditorEngine {
    /// Creates an engine from the `editor` and `project` configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            executable: config.editor.executable.clone(),
            project_root: config.project.root.clone(),
            timeout: Duration::from_secs(config.editor.timeout_seconds),
            log_file: config.editor.log_file.clone(),
            asset_bundle_method: config.editor.asset_bundle_method.clone(),
            player_method: config.editor.player_method.clone(),
        }
    }

    /// Builds the editor command line for one invocation.
    pub fn command_args(&self, target: BuildTarget, method: &str) -> Vec<String> {
        vec![
            "-batchmode".to_string(),
            "-quit".to_string(),
            "-projectPath".to_string(),
            self.project_root.to_string_lossy().to_string(),
            "-buildTarget".to_string(),
            target.editor_name().to_string(),
            "-executeMethod".to_string(),
            method.to_string(),
            "-logFile".to_string(),
            self.log_file.clone().unwrap_or_else(|| "-".to_string()),
        ]
    }

    /// Environment describing the request to the editor-side method.
    pub fn request_env<B: BuildKind>(
        context: &BuildContext<B>,
    ) -> Result<Vec<(String, String)>, EngineError> {
        Ok(vec![
            (
                "SIMPLEBUILD_BUILD_ID".to_string(),
                context.build_id.to_string(),
            ),
            (
                "SIMPLEBUILD_TARGET".to_string(),
                context.target.editor_name().to_string(),
            ),
            (
                "SIMPLEBUILD_OUTPUT_PATH".to_string(),
                context.output_path.to_string_lossy().to_string(),
            ),
            (
                "SIMPLEBUILD_OPTIONS".to_string(),
                serde_json::to_string(&context.options)?,
            ),
        ])
    }

    async fn execute<B: BuildKind>(
        &self,
        context: &BuildContext<B>,
        method: &str,
    ) -> Result<EngineReport, EngineError> {
        let start = Instant::now();
        let args = self.command_args(context.target, method);
        let envs = Self::request_env(context)?;

        info!(
            build_id = %context.build_id,
            executable = %self.executable,
            method = %method,
            target = %context.target,
            "Launching editor in batch mode"
        );

        let mut cmd = Command::new(&self.executable);
        cmd.args(&args)
            .envs(envs)
            .current_dir(&self.project_root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let result = tokio::time::timeout(self.timeout, cmd.output()).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(Ok(output)) => {
                let exit_code = output.status.code();

                if !output.status.success() {
                    let Some(code) = exit_code else {
                        error!(build_id = %context.build_id, "Editor was terminated by a signal");
                        return Err(EngineError::Killed);
                    };

                    let stderr = String::from_utf8_lossy(&output.stderr);
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    let tail = if stderr.trim().is_empty() {
                        tail_chars(&stdout, OUTPUT_TAIL_CHARS)
                    } else {
                        tail_chars(&stderr, OUTPUT_TAIL_CHARS)
                    };

                    error!(
                        build_id = %context.build_id,
                        exit_code = code,
                        duration_ms,
                        "Editor build failed"
                    );
                    return Err(EngineError::ProcessFailed { code, output: tail });
                }

                let output_size = output_size(&context.output_path).await;
                if output_size.is_none() {
                    warn!(
                        build_id = %context.build_id,
                        output_path = %context.output_path.display(),
                        "Editor succeeded but the output path does not exist"
                    );
                }

                info!(
                    build_id = %context.build_id,
                    duration_ms,
                    output_size = ?output_size,
                    "Editor build completed"
                );

                Ok(EngineReport {
                    output_path: context.output_path.clone(),
                    duration_ms,
                    exit_code,
                    output_size,
                })
            }
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                error!(executable = %self.executable, "Editor executable not found");
                Err(EngineError::NotFound(self.executable.clone()))
            }
            Ok(Err(e)) => {
                error!(executable = %self.executable, error = %e, "Failed to launch editor");
                Err(EngineError::Io(e))
            }
            Err(_) => {
                error!(
                    build_id = %context.build_id,
                    timeout_seconds = self.timeout.as_secs(),
                    "Editor timed out"
                );
                Err(EngineError::Timeout(self.timeout.as_secs()))
            }
        }
    }
}

#[async_trait]
impl BuildEngine for EditorEngine {
    fn name(&self) -> &str {
        "editor"
    }

    async fn build_asset_bundles(
        &self,
        context: &BuildContext<AssetBundleBuild>,
    ) -> Result<EngineReport, EngineError> {
        self.execute(context, &self.asset_bundle_method).await
    }

    async fn build_player(
        &self,
        context: &BuildContext<PlayerBuild>,
    ) -> Result<EngineReport, EngineError> {
        self.execute(context, &self.player_method).await
    }
}

fn tail_chars(text: &str, limit: usize) -> String {
    let count = text.chars().count();
    text.chars().skip(count.saturating_sub(limit)).collect()
}

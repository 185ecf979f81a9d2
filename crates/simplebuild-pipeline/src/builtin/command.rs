//! Hooks that run an external command.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use simplebuild_core::config::hooks::HookConfig;
use simplebuild_core::types::Phase;
use simplebuild_hooks::{
    BuildContext, BuildKind, HookError, OrderedCallback, PostContext, PostprocessHook,
    PreprocessHook,
};

/// Result placeholder value while the build has not run yet.
const PENDING: &str = "pending";

/// Runs a configured command as a preprocess or postprocess hook.
///
/// Arguments may contain `{target}`, `{output_path}`, `{build_id}`,
/// `{phase}` and `{result}`. The same values are exported as
/// `SIMPLEBUILD_*` environment variables.
#[derive(Debug, Clone)]
pub struct CommandHook {
    name: String,
    order: i32,
    command: String,
    args: Vec<String>,
    run_on_failure: bool,
    timeout: Option<Duration>,
}

impl CommandHook {
    /// Creates a hook from its configuration entry.
    pub fn from_config(config: &HookConfig) -> Self {
        Self {
            name: config.name.clone(),
            order: config.order,
            command: config.command.clone(),
            args: config.args.clone(),
            run_on_failure: config.run_on_failure,
            timeout: config.timeout_seconds.map(Duration::from_secs),
        }
    }

    /// Substitutes placeholders in every argument.
    ///
    /// Each argument is scanned once, so substituted values are never
    /// expanded again. Unknown `{...}` tokens are kept as written.
    pub fn render_args(&self, values: &[(&'static str, String)]) -> Vec<String> {
        self.args.iter().map(|arg| render(arg, values)).collect()
    }

    fn values<B: BuildKind>(
        context: &BuildContext<B>,
        phase: Phase,
        result: &str,
    ) -> Vec<(&'static str, String)> {
        Vec::from([
            ("target", context.target.editor_name().to_string()),
            (
                "output_path",
                context.output_path.to_string_lossy().to_string(),
            ),
            ("build_id", context.build_id.to_string()),
            ("phase", phase.as_str().to_string()),
            ("result", result.to_string()),
        ])
    }

    async fn run(&self, values: Vec<(&'static str, String)>) -> Result<(), HookError> {
        let args = self.render_args(&values);
        debug!(hook = %self.name, command = %self.command, args = ?args, "Running command hook");

        let mut cmd = Command::new(&self.command);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for (key, value) in &values {
            cmd.env(format!("SIMPLEBUILD_{}", key.to_uppercase()), value);
        }

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| HookError::Timeout { limit })??,
            None => cmd.output().await?,
        };

        if !output.status.success() {
            return Err(HookError::Command {
                command: self.command.clone(),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!(hook = %self.name, command = %self.command, "Command hook completed");
        Ok(())
    }
}

fn render(arg: &str, values: &[(&'static str, String)]) -> String {
    let mut rendered = String::with_capacity(arg.len());
    let mut rest = arg;

    while let Some(open) = rest.find('{') {
        rendered.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (value, close))
        });

        match value {
            Some((value, close)) => {
                rendered.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                rendered.push('{');
                rest = after;
            }
        }
    }

    rendered.push_str(rest);
    rendered
}

impl OrderedCallback for CommandHook {
    fn name(&self) -> &str {
        &self.name
    }

    fn order(&self) -> i32 {
        self.order
    }
}

#[async_trait]
impl<B: BuildKind> PreprocessHook<B> for CommandHook {
    async fn preprocess(&self, context: &BuildContext<B>) -> Result<(), HookError> {
        self.run(Self::values(context, B::PRE_PHASE, PENDING)).await
    }
}

#[async_trait]
impl<B: BuildKind> PostprocessHook<B> for CommandHook {
    async fn postprocess(&self, context: &PostContext<B>) -> Result<(), HookError> {
        self.run(Self::values(
            &context.build,
            B::POST_PHASE,
            context.result.status(),
        ))
        .await
    }

    fn runs_on_failure(&self) -> bool {
        self.run_on_failure
    }
}

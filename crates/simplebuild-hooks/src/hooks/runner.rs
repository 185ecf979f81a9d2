//! Pipeline runner. Runs pre hooks, the build action, then post hooks.
//!
//! - Every stage runs to completion before the next one starts; nothing is
//!   spawned concurrently.
//! - A failing hook stops the run immediately and is reported with its
//!   stage, name, and order.
//! - A failing build action does not stop the run: post hooks receive the
//!   failure and the failure is returned to the caller. If a post hook then
//!   fails too, its error carries the build's failure reason.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tracing::{debug, error, info, warn};

use super::definitions::{BuildContext, BuildKind, BuildResult, PostContext, Stage};
use super::registry::{BuildAction, PhaseHooks, PostprocessHook, PreprocessHook};
use crate::error::{HookError, PipelineError};

/// Progress of a single pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Nothing has run yet.
    Idle,
    /// Preprocess hooks are running.
    PreHooksRunning,
    /// The build action is running.
    BuildActionRunning,
    /// Postprocess hooks are running.
    PostHooksRunning,
    /// The run finished.
    Done,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::PreHooksRunning => "pre_hooks_running",
            Self::BuildActionRunning => "build_action_running",
            Self::PostHooksRunning => "post_hooks_running",
            Self::Done => "done",
        };
        write!(f, "{name}")
    }
}

/// Runs one build between its pre and post hooks.
///
/// The runner holds no per-run state, so one instance can drive any number
/// of sequential runs.
#[derive(Debug, Clone, Default)]
pub struct PipelineRunner {
    /// Upper bound for a single hook invocation.
    hook_timeout: Option<Duration>,
}

impl PipelineRunner {
    /// Creates a runner without hook timeouts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds every hook invocation by `timeout`.
    pub fn with_hook_timeout(mut self, timeout: Duration) -> Self {
        self.hook_timeout = Some(timeout);
        self
    }

    /// Returns the configured hook timeout.
    pub fn hook_timeout(&self) -> Option<Duration> {
        self.hook_timeout
    }

    /// Discovers the hooks of `hooks` and runs the pipeline with them.
    pub async fn run_with<B: BuildKind>(
        &self,
        action: &dyn BuildAction<B>,
        hooks: &PhaseHooks<B>,
        context: BuildContext<B>,
    ) -> Result<BuildResult<B::Report>, PipelineError> {
        let pre = hooks.pre().discover();
        let post = hooks.post().discover();
        self.run(action, &pre, &post, context).await
    }

    /// Runs `pre_hooks`, then `action`, then `post_hooks`, in the given order.
    pub async fn run<B: BuildKind>(
        &self,
        action: &dyn BuildAction<B>,
        pre_hooks: &[Arc<dyn PreprocessHook<B>>],
        post_hooks: &[Arc<dyn PostprocessHook<B>>],
        context: BuildContext<B>,
    ) -> Result<BuildResult<B::Report>, PipelineError> {
        let mut state = RunState::Idle;

        info!(
            build_id = %context.build_id,
            operation = %B::OPERATION,
            target = %context.target,
            output_path = %context.output_path.display(),
            pre_hooks = pre_hooks.len(),
            post_hooks = post_hooks.len(),
            "Starting build pipeline"
        );

        transition(&mut state, RunState::PreHooksRunning, &context);
        for hook in pre_hooks {
            debug!(phase = %B::PRE_PHASE, hook = %hook.name(), order = hook.order(), "Running preprocess hook");
            let outcome = self.guard(hook.preprocess(&context)).await;
            if let Err(source) = outcome {
                error!(
                    build_id = %context.build_id,
                    phase = %B::PRE_PHASE,
                    hook = %hook.name(),
                    order = hook.order(),
                    error = %source,
                    "Preprocess hook failed, aborting build"
                );
                return Err(PipelineError::HookInvocation {
                    phase: B::PRE_PHASE,
                    stage: Stage::PreHook,
                    hook: hook.name().to_string(),
                    order: hook.order(),
                    source,
                    build_failure: None,
                });
            }
        }

        transition(&mut state, RunState::BuildActionRunning, &context);
        let result = match AssertUnwindSafe(action.build(&context)).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => BuildResult::failure(format!(
                "build action panicked: {}",
                panic_message(panic.as_ref())
            )),
        };

        match &result {
            BuildResult::Success(_) => {
                info!(build_id = %context.build_id, target = %context.target, "Build action succeeded");
            }
            BuildResult::Failure { reason } => {
                warn!(
                    build_id = %context.build_id,
                    target = %context.target,
                    reason = %reason,
                    "Build action failed, running post hooks with the failure"
                );
            }
        }

        transition(&mut state, RunState::PostHooksRunning, &context);
        let post_context = PostContext::new(context, result);
        for hook in post_hooks {
            if post_context.result.is_failure() && !hook.runs_on_failure() {
                debug!(
                    phase = %B::POST_PHASE,
                    hook = %hook.name(),
                    "Skipping postprocess hook that opted out of failed builds"
                );
                continue;
            }

            debug!(phase = %B::POST_PHASE, hook = %hook.name(), order = hook.order(), "Running postprocess hook");
            let outcome = self.guard(hook.postprocess(&post_context)).await;
            if let Err(source) = outcome {
                error!(
                    build_id = %post_context.build.build_id,
                    phase = %B::POST_PHASE,
                    hook = %hook.name(),
                    order = hook.order(),
                    build_status = post_context.result.status(),
                    error = %source,
                    "Postprocess hook failed"
                );
                return Err(PipelineError::HookInvocation {
                    phase: B::POST_PHASE,
                    stage: Stage::PostHook,
                    hook: hook.name().to_string(),
                    order: hook.order(),
                    source,
                    build_failure: post_context.result.failure_reason().map(str::to_string),
                });
            }
        }

        transition(&mut state, RunState::Done, &post_context.build);
        info!(
            build_id = %post_context.build.build_id,
            status = post_context.result.status(),
            "Build pipeline finished"
        );

        Ok(post_context.result)
    }

    /// Awaits a hook, converting panics and timeouts into hook errors.
    async fn guard<F>(&self, hook: F) -> Result<(), HookError>
    where
        F: Future<Output = Result<(), HookError>>,
    {
        let guarded = AssertUnwindSafe(hook).catch_unwind();

        let outcome = match self.hook_timeout {
            Some(limit) => tokio::time::timeout(limit, guarded)
                .await
                .map_err(|_| HookError::Timeout { limit })?,
            None => guarded.await,
        };

        match outcome {
            Ok(result) => result,
            Err(panic) => Err(HookError::Panicked(panic_message(panic.as_ref()))),
        }
    }
}

fn transition<B: BuildKind>(state: &mut RunState, next: RunState, context: &BuildContext<B>) {
    debug!(build_id = %context.build_id, from = %state, to = %next, "Pipeline state change");
    *state = next;
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

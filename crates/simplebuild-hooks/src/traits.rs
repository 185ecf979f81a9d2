//! Closure adapters for hooks and build actions.

use std::fmt;

use async_trait::async_trait;

use crate::error::HookError;
use crate::hooks::definitions::{BuildContext, BuildKind, BuildResult, PostContext};
use crate::hooks::registry::{BuildAction, OrderedCallback, PostprocessHook, PreprocessHook};

/// A closure-based hook for quick hook creation.
///
/// The closure's argument type decides the capability: a closure over
/// `&BuildContext<B>` is a preprocess hook, one over `&PostContext<B>` a
/// postprocess hook.
pub struct FnHook<F> {
    /// Hook name.
    name: String,
    /// Execution order.
    order: i32,
    /// Whether a postprocess hook runs after failed builds.
    on_failure: bool,
    /// Hook body.
    f: F,
}

impl<F> FnHook<F> {
    /// Creates a new closure-based hook.
    pub fn new(name: &str, order: i32, f: F) -> Self {
        Self {
            name: name.to_string(),
            order,
            on_failure: true,
            f,
        }
    }

    /// Skips this hook when used as a postprocess hook after a failed build.
    pub fn success_only(mut self) -> Self {
        self.on_failure = false;
        self
    }
}

impl<F> fmt::Debug for FnHook<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHook")
            .field("name", &self.name)
            .field("order", &self.order)
            .field("on_failure", &self.on_failure)
            .field("f", &"<closure>")
            .finish()
    }
}

impl<F: Send + Sync> OrderedCallback for FnHook<F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn order(&self) -> i32 {
        self.order
    }
}

#[async_trait]
impl<B, F> PreprocessHook<B> for FnHook<F>
where
    B: BuildKind,
    F: Fn(&BuildContext<B>) -> Result<(), HookError> + Send + Sync,
{
    async fn preprocess(&self, context: &BuildContext<B>) -> Result<(), HookError> {
        (self.f)(context)
    }
}

#[async_trait]
impl<B, F> PostprocessHook<B> for FnHook<F>
where
    B: BuildKind,
    F: Fn(&PostContext<B>) -> Result<(), HookError> + Send + Sync,
{
    async fn postprocess(&self, context: &PostContext<B>) -> Result<(), HookError> {
        (self.f)(context)
    }

    fn runs_on_failure(&self) -> bool {
        self.on_failure
    }
}

/// A closure-based build action.
pub struct FnAction<F> {
    /// Action body.
    f: F,
}

impl<F> FnAction<F> {
    /// Wraps a closure as a build action.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> fmt::Debug for FnAction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAction").field("f", &"<closure>").finish()
    }
}

#[async_trait]
impl<B, F> BuildAction<B> for FnAction<F>
where
    B: BuildKind,
    F: Fn(&BuildContext<B>) -> BuildResult<B::Report> + Send + Sync,
{
    async fn build(&self, context: &BuildContext<B>) -> BuildResult<B::Report> {
        (self.f)(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use simplebuild_core::types::{BuildOperation, BuildTarget, Phase};

    use crate::hooks::registry::PhaseHooks;
    use crate::hooks::runner::PipelineRunner;

    #[derive(Debug, Clone)]
    struct Bundles;

    impl BuildKind for Bundles {
        type Options = bool;
        type Report = usize;
        const OPERATION: BuildOperation = BuildOperation::AssetBundle;
        const PRE_PHASE: Phase = Phase::PreAssetBundle;
        const POST_PHASE: Phase = Phase::PostAssetBundle;
    }

    #[tokio::test]
    async fn test_closures_as_hooks_and_action() {
        let saw_pre = Arc::new(AtomicBool::new(false));
        let saw_post = Arc::new(AtomicBool::new(false));

        let mut hooks = PhaseHooks::<Bundles>::new();
        let pre_flag = saw_pre.clone();
        hooks
            .add_pre(FnHook::new("mark", 0, move |ctx: &BuildContext<Bundles>| {
                assert!(ctx.options);
                pre_flag.store(true, Ordering::SeqCst);
                Ok(())
            }))
            .unwrap();
        let post_flag = saw_post.clone();
        hooks
            .add_post(FnHook::new("check", 0, move |ctx: &PostContext<Bundles>| {
                assert_eq!(ctx.result.report(), Some(&3));
                post_flag.store(true, Ordering::SeqCst);
                Ok(())
            }))
            .unwrap();

        let action = FnAction::new(|_ctx: &BuildContext<Bundles>| BuildResult::Success(3usize));
        let context = BuildContext::new(BuildTarget::Ios, "Assets/AssetBundles/iOS", true);
        let result = PipelineRunner::new()
            .run_with(&action, &hooks, context)
            .await
            .unwrap();

        assert_eq!(result, BuildResult::Success(3usize));
        assert!(saw_pre.load(Ordering::SeqCst));
        assert!(saw_post.load(Ordering::SeqCst));
    }

    #[test]
    fn test_success_only() {
        let hook = FnHook::new("upload", 3, |_ctx: &PostContext<Bundles>| Ok(())).success_only();
        assert!(!PostprocessHook::<Bundles>::runs_on_failure(&hook));
        assert_eq!(hook.order(), 3);
        assert!(format!("{hook:?}").contains("upload"));
    }
}

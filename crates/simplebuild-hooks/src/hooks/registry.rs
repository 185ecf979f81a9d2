//! Hook registry. Hooks are registered explicitly and discovered in order.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use simplebuild_core::types::Phase;

use super::definitions::{BuildContext, BuildKind, BuildResult, PostContext};
use crate::error::{HookError, RegistryError};

/// Behaviour shared by every hook: a name and an execution order.
pub trait OrderedCallback: Send + Sync {
    /// Name used in logs and error messages. Unique within a registry.
    fn name(&self) -> &str;

    /// Execution order (lower = runs first). Default: 0.
    fn order(&self) -> i32 {
        0
    }
}

/// Hook that runs before the build action of a `B` build.
#[async_trait]
pub trait PreprocessHook<B: BuildKind>: OrderedCallback {
    /// Runs the hook. Returning an error aborts the pipeline.
    async fn preprocess(&self, context: &BuildContext<B>) -> Result<(), HookError>;
}

/// Hook that runs after the build action of a `B` build.
#[async_trait]
pub trait PostprocessHook<B: BuildKind>: OrderedCallback {
    /// Runs the hook with the build result. Returning an error aborts the
    /// remaining post hooks.
    async fn postprocess(&self, context: &PostContext<B>) -> Result<(), HookError>;

    /// Whether this hook runs after a failed build. Default: `true`.
    fn runs_on_failure(&self) -> bool {
        true
    }
}

/// The build step wrapped by a pipeline.
#[async_trait]
pub trait BuildAction<B: BuildKind>: Send + Sync {
    /// Performs the build. Failures are reported in the result, not raised.
    async fn build(&self, context: &BuildContext<B>) -> BuildResult<B::Report>;
}

/// Description of a registered hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookInfo {
    /// Hook name.
    pub name: String,
    /// Phase the hook runs in.
    pub phase: Phase,
    /// Declared order.
    pub order: i32,
}

/// Ordered collection of hooks implementing one capability `H`.
pub struct HookRegistry<H: ?Sized> {
    /// Hooks in registration order.
    hooks: Vec<Arc<H>>,
}

impl<H: ?Sized + OrderedCallback> HookRegistry<H> {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Registers a hook.
    ///
    /// Names must be non-empty and unique within the registry.
    pub fn register(&mut self, hook: Arc<H>) -> Result<(), RegistryError> {
        let name = hook.name().to_string();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.hooks.iter().any(|h| h.name() == name) {
            return Err(RegistryError::DuplicateName { name });
        }

        debug!(hook = %name, order = hook.order(), "Hook registered");
        self.hooks.push(hook);
        Ok(())
    }

    /// Removes a hook by name. Returns `true` if it was registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        let before = self.hooks.len();
        self.hooks.retain(|h| h.name() != name);
        before != self.hooks.len()
    }

    /// Returns the registered hooks sorted by ascending order.
    ///
    /// Hooks with equal order keep their registration order. No hook logic
    /// runs during discovery.
    pub fn discover(&self) -> Vec<Arc<H>> {
        let mut hooks = self.hooks.clone();
        hooks.sort_by_key(|h| h.order());
        hooks
    }

    /// Returns the number of registered hooks.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns whether no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Describes the hooks in discovery order.
    pub fn describe(&self, phase: Phase) -> Vec<HookInfo> {
        self.discover()
            .iter()
            .map(|h| HookInfo {
                name: h.name().to_string(),
                phase,
                order: h.order(),
            })
            .collect()
    }
}

impl<H: ?Sized + OrderedCallback> Default for HookRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized + OrderedCallback> fmt::Debug for HookRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field(
                "hooks",
                &self.hooks.iter().map(|h| h.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// The pre and post hook registries of one build kind.
pub struct PhaseHooks<B: BuildKind> {
    /// Hooks run before the build action.
    pre: HookRegistry<dyn PreprocessHook<B>>,
    /// Hooks run after the build action.
    post: HookRegistry<dyn PostprocessHook<B>>,
}

impl<B: BuildKind> PhaseHooks<B> {
    /// Creates empty registries.
    pub fn new() -> Self {
        Self {
            pre: HookRegistry::new(),
            post: HookRegistry::new(),
        }
    }

    /// Registers a shared preprocess hook.
    pub fn register_pre(&mut self, hook: Arc<dyn PreprocessHook<B>>) -> Result<(), RegistryError> {
        self.pre.register(hook)?;
        info!(phase = %B::PRE_PHASE, hooks = self.pre.len(), "Preprocess hook added");
        Ok(())
    }

    /// Registers a shared postprocess hook.
    pub fn register_post(
        &mut self,
        hook: Arc<dyn PostprocessHook<B>>,
    ) -> Result<(), RegistryError> {
        self.post.register(hook)?;
        info!(phase = %B::POST_PHASE, hooks = self.post.len(), "Postprocess hook added");
        Ok(())
    }

    /// Registers an owned preprocess hook.
    pub fn add_pre<H: PreprocessHook<B> + 'static>(&mut self, hook: H) -> Result<(), RegistryError> {
        self.register_pre(Arc::new(hook))
    }

    /// Registers an owned postprocess hook.
    pub fn add_post<H: PostprocessHook<B> + 'static>(
        &mut self,
        hook: H,
    ) -> Result<(), RegistryError> {
        self.register_post(Arc::new(hook))
    }

    /// Returns the preprocess registry.
    pub fn pre(&self) -> &HookRegistry<dyn PreprocessHook<B>> {
        &self.pre
    }

    /// Returns the postprocess registry.
    pub fn post(&self) -> &HookRegistry<dyn PostprocessHook<B>> {
        &self.post
    }

    /// Describes all hooks, pre phase first, each in discovery order.
    pub fn describe(&self) -> Vec<HookInfo> {
        let mut infos = self.pre.describe(B::PRE_PHASE);
        infos.extend(self.post.describe(B::POST_PHASE));
        infos
    }

    /// Returns the total number of registered hooks.
    pub fn len(&self) -> usize {
        self.pre.len() + self.post.len()
    }

    /// Returns whether no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<B: BuildKind> Default for PhaseHooks<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: BuildKind> fmt::Debug for PhaseHooks<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseHooks")
            .field("pre", &self.pre)
            .field("post", &self.post)
            .finish()
    }
}

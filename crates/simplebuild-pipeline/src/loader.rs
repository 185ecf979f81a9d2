//! Registers hooks declared in configuration on a pipeline.

use std::sync::Arc;

use tracing::{debug, info};

use simplebuild_core::config::AppConfig;
use simplebuild_hooks::{BuildKind, PhaseHooks, RegistryError};

use crate::builtin::{CommandHook, ManifestHook};

/// Registers the enabled `[[hooks]]` entries whose phase belongs to `B`, and
/// the manifest hook when `manifest.enabled` is set.
///
/// Returns the number of hooks registered.
pub fn register_configured_hooks<B: BuildKind>(
    config: &AppConfig,
    hooks: &mut PhaseHooks<B>,
) -> Result<usize, RegistryError> {
    let mut registered = 0;

    for entry in &config.hooks {
        if entry.phase.operation() != B::OPERATION {
            continue;
        }
        if !entry.enabled {
            debug!(hook = %entry.name, phase = %entry.phase, "Skipping disabled hook");
            continue;
        }

        let hook = Arc::new(CommandHook::from_config(entry));
        if entry.phase.is_pre() {
            hooks.register_pre(hook)?;
        } else {
            hooks.register_post(hook)?;
        }
        registered += 1;
    }

    if config.manifest.enabled {
        hooks.add_post(ManifestHook::from_config(&config.manifest))?;
        registered += 1;
    }

    info!(operation = %B::OPERATION, count = registered, "Configured hooks registered");
    Ok(registered)
}

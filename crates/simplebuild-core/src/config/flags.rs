//! `BUILD_*` environment flags.
//!
//! CI jobs toggle build behaviour through plain environment variables such as
//! `BUILD_DEVELOPMENT=false`. The values are kept as raw strings because the
//! two build kinds compare them differently: asset bundles opt *in* on an
//! exact `"true"`, while player options opt *out* on an exact `"false"`.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Environment variable prefix shared by every flag.
pub const FLAG_PREFIX: &str = "BUILD";

/// Raw values of the `BUILD_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildFlags {
    /// `BUILD_DEVELOPMENT`
    pub development: Option<String>,
    /// `BUILD_CLEAN`
    pub clean: Option<String>,
    /// `BUILD_CONNECT_WITH_PROFILER`
    pub connect_with_profiler: Option<String>,
    /// `BUILD_ALLOW_DEBUGGING`
    pub allow_debugging: Option<String>,
    /// `BUILD_ASSETBUNDLE_FORCE_REBUILD`
    pub assetbundle_force_rebuild: Option<String>,
}

impl BuildFlags {
    /// Reads the flags from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_environment(config::Environment::with_prefix(FLAG_PREFIX))
    }

    /// Reads the flags from an explicit variable map instead of the process
    /// environment.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let source: config::Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        Self::from_environment(config::Environment::with_prefix(FLAG_PREFIX).source(Some(source)))
    }

    fn from_environment(env: config::Environment) -> Result<Self, AppError> {
        config::Config::builder()
            .add_source(env)
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to read build flags: {e}")))?
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Invalid build flags: {e}")))
    }

    /// Asset bundles are development builds only when explicitly enabled.
    pub fn asset_bundle_development(&self) -> bool {
        is_true(&self.development)
    }

    /// Players are development builds unless explicitly disabled.
    pub fn player_development(&self) -> bool {
        is_not_false(&self.development)
    }

    /// Development players connect to the profiler unless disabled.
    pub fn connect_with_profiler(&self) -> bool {
        is_not_false(&self.connect_with_profiler)
    }

    /// Development players allow script debugging unless disabled.
    pub fn allow_debugging(&self) -> bool {
        is_not_false(&self.allow_debugging)
    }

    /// Whether the player output is replaced instead of appended to.
    pub fn clean(&self) -> bool {
        is_true(&self.clean)
    }

    /// Whether a configured force rebuild is allowed to take effect.
    pub fn force_rebuild_allowed(&self) -> bool {
        is_not_false(&self.assetbundle_force_rebuild)
    }
}

fn is_true(value: &Option<String>) -> bool {
    value.as_deref() == Some("true")
}

fn is_not_false(value: &Option<String>) -> bool {
    value.as_deref() != Some("false")
}

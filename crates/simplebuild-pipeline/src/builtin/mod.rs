//! Hooks shipped with SimpleBuild.

pub mod command;
pub mod manifest;

pub use command::CommandHook;
pub use manifest::{BuildManifest, MANIFEST_HOOK_NAME, ManifestHook};

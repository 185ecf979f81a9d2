//! # simplebuild-pipeline
//!
//! The two build pipelines of SimpleBuild and their collaborators:
//!
//! - [`asset_bundle`]: packages asset bundles into a per-platform directory
//! - [`player`]: builds iOS / Android player binaries
//! - [`engine`]: the external build engine (editor in batch mode, or dry run)
//! - [`builtin`]: command and manifest hooks
//! - [`loader`]: registers configured hooks on a pipeline

pub mod asset_bundle;
pub mod builtin;
pub mod engine;
pub mod error;
pub mod loader;
pub mod player;

pub use asset_bundle::{AssetBundleBuild, AssetBundleBuilder, AssetBundleOptions};
pub use engine::{BuildEngine, DryRunEngine, EditorEngine, EngineAction, EngineError, EngineReport};
pub use error::BuildError;
pub use player::{PlayerBuild, PlayerBuilder, PlayerOptions};

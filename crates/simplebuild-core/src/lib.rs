//! # simplebuild-core
//!
//! Core crate for SimpleBuild. Contains configuration schemas, the
//! `BUILD_*` environment flags, build target and phase types, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other SimpleBuild crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;

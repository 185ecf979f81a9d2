//! End-to-end tests for the asset bundle and player pipelines.

mod helpers;

mod asset_bundle_test;
mod configured_hooks_test;
mod player_test;

//! CLI command implementations.
//!
//! - [`assets`] - Download assets by id
//! - [`group`] - Download a group's listed clothing
//! - [`rename`] - Rename artifacts after a saved catalog
//! - [`config`] - Configuration management (init, path, show)

pub mod assets;
pub mod config;
pub mod group;
pub mod rename;

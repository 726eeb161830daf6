//! clothier - clothing texture downloader and compositor
//!
//! Downloads clothing textures from the Roblox asset delivery service and
//! stores each one composited with a template image. Assets are given
//! directly by id or discovered from a group's catalog listing.
//!
//! # High-Level API
//!
//! [`pipeline::AssetPipeline`] is the entry point:
//!
//! ```no_run
//! use clothier::config::PipelineConfig;
//! use clothier::pipeline::AssetPipeline;
//!
//! # async fn run() -> Result<(), clothier::pipeline::PipelineError> {
//! let pipeline = AssetPipeline::from_config(PipelineConfig::default())?;
//! let paths = pipeline.download_group_items("1234567", "Updated", 10).await?;
//! # Ok(())
//! # }
//! ```

pub mod asset;
pub mod catalog;
pub mod config;
pub mod http;
pub mod logging;
pub mod pipeline;

/// Version of the clothier library and CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

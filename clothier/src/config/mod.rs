//! Configuration for clothier.
//!
//! - [`PipelineConfig`] is the builder-style configuration consumed by the
//!   pipeline.
//! - [`ConfigFile`] is the user's `~/.clothier/config.ini`, which converts
//!   into a [`PipelineConfig`].
//!
//! # Example
//!
//! ```
//! use clothier::config::{ConfigFile, PipelineConfig};
//!
//! let file = ConfigFile::default();
//! let config: PipelineConfig = file.to_pipeline_config().with_max_concurrent(4);
//! assert_eq!(config.max_concurrent(), 4);
//! ```

mod defaults;
mod file;
mod parser;
mod pipeline;
mod settings;
mod writer;

pub use defaults::*;
pub use file::ConfigFileError;
pub use pipeline::PipelineConfig;
pub use settings::{
    CatalogSettings, CompositorSettings, ConfigFile, EndpointSettings, LoggingSettings,
    NetworkSettings, RuntimeSettings,
};

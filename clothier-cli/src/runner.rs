//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, the async runtime
//! and pipeline creation so command handlers stay short.

use std::future::Future;
use std::path::PathBuf;

use clothier::config::{ConfigFile, PipelineConfig};
use clothier::logging::{init_logging, split_log_path, LoggingGuard};
use clothier::pipeline::AssetPipeline;
use tracing::info;

use crate::error::CliError;

/// Settings given on the command line, taking precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub runtime_dir: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub max_concurrent: Option<usize>,
    pub debug: bool,
}

impl Overrides {
    /// Applies these overrides on top of the config file.
    pub fn apply(&self, config: &ConfigFile) -> PipelineConfig {
        let mut pipeline = config.to_pipeline_config();
        if let Some(dir) = &self.runtime_dir {
            pipeline = pipeline.with_runtime_dir(dir);
        }
        if let Some(template) = &self.template {
            pipeline = pipeline.with_template(Some(template.clone()));
        }
        if let Some(max) = self.max_concurrent {
            pipeline = pipeline.with_max_concurrent(max);
        }
        pipeline
    }
}

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
    overrides: Overrides,
}

impl CliRunner {
    /// Loads the config file and initializes logging.
    pub fn new(overrides: Overrides) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let (log_dir, log_file) = split_log_path(&config.logging.file);
        let logging_guard = init_logging(&log_dir, &log_file, true, overrides.debug)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
            overrides,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Pipeline configuration after command-line overrides.
    pub fn pipeline_config(&self) -> PipelineConfig {
        self.overrides.apply(&self.config)
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("clothier v{}", clothier::VERSION);
        info!("clothier CLI: {} command", command);
    }

    /// Builds the production pipeline.
    pub fn create_pipeline(&self) -> Result<AssetPipeline<clothier::http::ReqwestConnector>, CliError> {
        AssetPipeline::from_config(self.pipeline_config()).map_err(CliError::from)
    }

    /// Runs a future to completion on a fresh multi-threaded runtime.
    pub fn block_on<F: Future>(&self, future: F) -> Result<F::Output, CliError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)?;
        Ok(runtime.block_on(future))
    }
}

/// Prints the artifact summary shared by download commands.
pub fn print_summary(requested: usize, artifacts: &[PathBuf]) {
    println!();
    println!("Stored {} of {} assets", artifacts.len(), requested);
    for path in artifacts {
        println!("  {}", path.display());
    }
}

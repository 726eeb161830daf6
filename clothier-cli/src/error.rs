//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use clothier::catalog::RenameError;
use clothier::config::ConfigFileError;
use clothier::pipeline::PipelineError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file error
    Config(ConfigFileError),
    /// Invalid command-line argument
    InvalidArgument(String),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Pipeline could not be built or a run could not start
    Pipeline(PipelineError),
    /// Catalog-driven renaming failed
    Rename(RenameError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Pipeline(PipelineError::TemplateNotFound(_)) => {
                eprintln!();
                eprintln!("Either:");
                eprintln!("  1. Place a template.png in the runtime directory, or");
                eprintln!("  2. Pass --template with the path to an existing image, or");
                eprintln!("  3. Remove the template setting from the config file");
            }
            CliError::Pipeline(PipelineError::Catalog(_)) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. The group id does not exist or has no public clothing");
                eprintln!("  2. The catalog service is rate limiting; try again later");
            }
            CliError::Rename(RenameError::ReadCatalog { .. }) => {
                eprintln!();
                eprintln!("Save the group catalog first, or pass --catalog <PATH>.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Pipeline(e) => write!(f, "{}", e),
            CliError::Rename(e) => write!(f, "Rename failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Pipeline(e) => Some(e),
            CliError::Rename(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        CliError::Pipeline(e)
    }
}

impl From<RenameError> for CliError {
    fn from(e: RenameError) -> Self {
        CliError::Rename(e)
    }
}

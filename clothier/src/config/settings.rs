//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Runtime directory layout
    pub runtime: RuntimeSettings,
    /// Network settings
    pub network: NetworkSettings,
    /// Composite worker settings
    pub compositor: CompositorSettings,
    /// Group listing settings
    pub catalog: CatalogSettings,
    /// Remote endpoints
    pub endpoints: EndpointSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Runtime directory configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    /// Directory holding assets/, the default template and the cookie file
    pub directory: PathBuf,
    /// Explicit template image; must exist when set
    pub template: Option<PathBuf>,
    /// Explicit cookie file; defaults to `{directory}/roblox_cookie.txt`
    pub cookie_file: Option<PathBuf>,
}

/// Network configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkSettings {
    /// Maximum concurrently admitted remote operations
    pub max_concurrent: usize,
    /// Timeout in seconds for HTTP requests
    pub timeout: u64,
    /// User-Agent header value
    pub user_agent: String,
}

/// Compositor configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositorSettings {
    /// Number of concurrent composite workers
    pub workers: usize,
    /// Keep the raw write-first file when compositing fails
    pub keep_partial: bool,
}

/// Catalog listing configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSettings {
    /// Items requested per page
    pub page_size: u32,
    /// Sort order passed to the listing endpoint
    pub sort: String,
    /// Default number of group items to download
    pub limit: usize,
}

/// Remote endpoint configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointSettings {
    /// Asset delivery endpoint (resolution and content)
    pub asset_delivery: String,
    /// Catalog search endpoint
    pub catalog_search: String,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}

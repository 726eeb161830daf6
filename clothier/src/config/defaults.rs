//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use std::path::PathBuf;

use super::settings::*;

// =============================================================================
// Runtime layout
// =============================================================================

/// Default runtime directory (relative to the working directory).
pub const DEFAULT_RUNTIME_DIR: &str = "./runtime/";

/// Subdirectory of the runtime directory holding produced artifacts.
pub const ASSETS_DIR_NAME: &str = "assets";

/// Template file looked up in the runtime directory when none is configured.
pub const TEMPLATE_FILE_NAME: &str = "template.png";

/// Auth cookie file looked up in the runtime directory.
pub const COOKIE_FILE_NAME: &str = "roblox_cookie.txt";

/// Catalog file produced by the external scraper, consumed by the renamer.
pub const CATALOG_FILE_NAME: &str = "catalog_items.json";

/// Extension of every produced artifact.
pub const ARTIFACT_EXTENSION: &str = "png";

// =============================================================================
// Network
// =============================================================================

/// Default cap on concurrently admitted remote operations.
pub const DEFAULT_MAX_CONCURRENT: usize = 10;

/// Default total timeout per HTTP request in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Idle connections kept per host in a session's pool.
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 20;

/// Default User-Agent string for HTTP requests.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Asset delivery endpoint, used for both resolution and content.
pub const DEFAULT_ASSET_DELIVERY_URL: &str = "https://assetdelivery.roblox.com/v1/asset/";

/// Catalog search endpoint used for group listings.
pub const DEFAULT_CATALOG_SEARCH_URL: &str = "https://catalog.roblox.com/v1/search/items/details";

// =============================================================================
// Compositor
// =============================================================================

/// Default number of composite workers. Kept below the network cap.
pub const DEFAULT_WORKER_THREADS: usize = 5;

/// Whether write-first files survive a failed composite by default.
pub const DEFAULT_KEEP_PARTIAL_ARTIFACTS: bool = false;

// =============================================================================
// Catalog
// =============================================================================

/// Items requested per catalog page.
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Default catalog sort order.
pub const DEFAULT_SORT: &str = "Updated";

/// Default number of group items to download.
pub const DEFAULT_GROUP_LIMIT: usize = 10;

// =============================================================================
// Paths
// =============================================================================

/// Get the path to the config directory (~/.clothier).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".clothier")
}

/// Get the path to the config file (~/.clothier/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

/// Get the default log file path (~/.clothier/clothier.log).
pub fn default_log_file() -> PathBuf {
    config_directory().join("clothier.log")
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            runtime: RuntimeSettings {
                directory: PathBuf::from(DEFAULT_RUNTIME_DIR),
                template: None,
                cookie_file: None,
            },
            network: NetworkSettings {
                max_concurrent: DEFAULT_MAX_CONCURRENT,
                timeout: DEFAULT_TIMEOUT_SECS,
                user_agent: DEFAULT_USER_AGENT.to_string(),
            },
            compositor: CompositorSettings {
                workers: DEFAULT_WORKER_THREADS,
                keep_partial: DEFAULT_KEEP_PARTIAL_ARTIFACTS,
            },
            catalog: CatalogSettings {
                page_size: DEFAULT_PAGE_SIZE,
                sort: DEFAULT_SORT.to_string(),
                limit: DEFAULT_GROUP_LIMIT,
            },
            endpoints: EndpointSettings {
                asset_delivery: DEFAULT_ASSET_DELIVERY_URL.to_string(),
                catalog_search: DEFAULT_CATALOG_SEARCH_URL.to_string(),
            },
            logging: LoggingSettings {
                file: default_log_file(),
            },
        }
    }
}

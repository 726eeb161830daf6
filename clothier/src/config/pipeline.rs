//! Pipeline configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::defaults::*;
use crate::http::SessionConfig;

/// Configuration for an asset pipeline.
///
/// Groups every parameter the orchestrator needs, providing sensible
/// defaults while allowing customization.
///
/// # Example
///
/// ```
/// use clothier::config::PipelineConfig;
///
/// // Using defaults
/// let config = PipelineConfig::default();
/// assert_eq!(config.max_concurrent(), 10);
/// assert_eq!(config.worker_threads(), 5);
///
/// // Custom configuration
/// let config = PipelineConfig::new()
///     .with_runtime_dir("/tmp/runtime")
///     .with_max_concurrent(4)
///     .with_worker_threads(2);
/// assert_eq!(config.assets_dir(), std::path::Path::new("/tmp/runtime/assets"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    runtime_dir: PathBuf,
    template: Option<PathBuf>,
    cookie_file: Option<PathBuf>,
    max_concurrent: usize,
    worker_threads: usize,
    timeout_secs: u64,
    user_agent: String,
    page_size: u32,
    keep_partial_artifacts: bool,
    asset_delivery_url: String,
    catalog_search_url: String,
}

impl PipelineConfig {
    /// Create a new pipeline configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the runtime directory. Artifacts go to `<dir>/assets/`.
    pub fn with_runtime_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.runtime_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set an explicit template image.
    ///
    /// An explicit template must exist when the pipeline is built. With
    /// `None`, `<runtime_dir>/template.png` is used if present.
    pub fn with_template(mut self, template: Option<PathBuf>) -> Self {
        self.template = template;
        self
    }

    /// Set the auth cookie file. `None` means `<runtime_dir>/roblox_cookie.txt`.
    pub fn with_cookie_file(mut self, cookie_file: Option<PathBuf>) -> Self {
        self.cookie_file = cookie_file;
        self
    }

    /// Set the cap on concurrently admitted remote operations.
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max;
        self
    }

    /// Set the number of concurrent composite workers.
    pub fn with_worker_threads(mut self, workers: usize) -> Self {
        self.worker_threads = workers;
        self
    }

    /// Set the HTTP request timeout in seconds.
    pub fn with_timeout_secs(mut self, timeout: u64) -> Self {
        self.timeout_secs = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the number of items requested per catalog page.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Keep the raw write-first file when compositing fails.
    pub fn with_keep_partial_artifacts(mut self, keep: bool) -> Self {
        self.keep_partial_artifacts = keep;
        self
    }

    /// Override the asset delivery endpoint.
    pub fn with_asset_delivery_url(mut self, url: impl Into<String>) -> Self {
        self.asset_delivery_url = url.into();
        self
    }

    /// Override the catalog search endpoint.
    pub fn with_catalog_search_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_search_url = url.into();
        self
    }

    pub fn runtime_dir(&self) -> &Path {
        &self.runtime_dir
    }

    /// Directory that receives one image per processed asset.
    pub fn assets_dir(&self) -> PathBuf {
        self.runtime_dir.join(ASSETS_DIR_NAME)
    }

    /// Explicitly configured template, if any.
    pub fn template(&self) -> Option<&Path> {
        self.template.as_deref()
    }

    /// Template path actually consulted: the explicit one or the runtime default.
    pub fn template_path(&self) -> PathBuf {
        self.template
            .clone()
            .unwrap_or_else(|| self.runtime_dir.join(TEMPLATE_FILE_NAME))
    }

    /// Cookie file actually consulted.
    pub fn cookie_file_path(&self) -> PathBuf {
        self.cookie_file
            .clone()
            .unwrap_or_else(|| self.runtime_dir.join(COOKIE_FILE_NAME))
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    pub fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn keep_partial_artifacts(&self) -> bool {
        self.keep_partial_artifacts
    }

    pub fn asset_delivery_url(&self) -> &str {
        &self.asset_delivery_url
    }

    pub fn catalog_search_url(&self) -> &str {
        &self.catalog_search_url
    }

    /// HTTP session settings derived from this configuration.
    pub fn session_config(&self, auth_cookie: Option<String>) -> SessionConfig {
        SessionConfig::default()
            .with_user_agent(self.user_agent.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_auth_cookie(auth_cookie)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            runtime_dir: PathBuf::from(DEFAULT_RUNTIME_DIR),
            template: None,
            cookie_file: None,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            worker_threads: DEFAULT_WORKER_THREADS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            keep_partial_artifacts: DEFAULT_KEEP_PARTIAL_ARTIFACTS,
            asset_delivery_url: DEFAULT_ASSET_DELIVERY_URL.to_string(),
            catalog_search_url: DEFAULT_CATALOG_SEARCH_URL.to_string(),
        }
    }
}

//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::defaults::DEFAULT_USER_AGENT;
use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let template = config
        .runtime
        .template
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();
    let cookie_file = config
        .runtime
        .cookie_file
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();
    // Blank means the built-in agent, whose ';' would read as an inline comment
    let user_agent = if config.network.user_agent == DEFAULT_USER_AGENT {
        ""
    } else {
        config.network.user_agent.as_str()
    };
    let keep_partial = if config.compositor.keep_partial {
        "true"
    } else {
        "false"
    };

    format!(
        r#"[runtime]
; Runtime directory: artifacts are written to <directory>/assets/
directory = {}
; Template image composited over every download. Leave empty to use
; <directory>/template.png when it exists, or to skip compositing otherwise.
template = {}
; File holding the auth cookie. Leave empty for <directory>/roblox_cookie.txt
cookie_file = {}

[network]
; Maximum concurrent remote requests (resolution + download combined)
max_concurrent = {}
; Request timeout in seconds
timeout = {}
; User-Agent header. Leave empty for the built-in browser agent
user_agent = {}

[compositor]
; Number of images composited at once
workers = {}
; Keep the raw downloaded file when compositing fails (true/false)
keep_partial = {}

[catalog]
; Items requested per listing page
page_size = {}
; Listing sort order (e.g. Updated, Sales, Relevance)
sort = {}
; Default number of group items to download
limit = {}

[endpoints]
asset_delivery = {}
catalog_search = {}

[logging]
file = {}
"#,
        path_to_string(&config.runtime.directory),
        template,
        cookie_file,
        config.network.max_concurrent,
        config.network.timeout,
        user_agent,
        config.compositor.workers,
        keep_partial,
        config.catalog.page_size,
        config.catalog.sort,
        config.catalog.limit,
        config.endpoints.asset_delivery,
        config.endpoints.catalog_search,
        path_to_string(&config.logging.file),
    )
}

fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [runtime] section
    if let Some(section) = ini.section(Some("runtime")) {
        if let Some(v) = non_empty(section.get("directory")) {
            config.runtime.directory = expand_tilde(v);
        }
        if let Some(v) = non_empty(section.get("template")) {
            config.runtime.template = Some(expand_tilde(v));
        }
        if let Some(v) = non_empty(section.get("cookie_file")) {
            config.runtime.cookie_file = Some(expand_tilde(v));
        }
    }

    // [network] section
    if let Some(section) = ini.section(Some("network")) {
        if let Some(v) = section.get("max_concurrent") {
            config.network.max_concurrent = parse_positive("network", "max_concurrent", v)?;
        }
        if let Some(v) = section.get("timeout") {
            config.network.timeout = v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "network".to_string(),
                key: "timeout".to_string(),
                value: v.to_string(),
                reason: "must be a positive integer (seconds)".to_string(),
            })?;
        }
        if let Some(v) = non_empty(section.get("user_agent")) {
            config.network.user_agent = v.to_string();
        }
    }

    // [compositor] section
    if let Some(section) = ini.section(Some("compositor")) {
        if let Some(v) = section.get("workers") {
            config.compositor.workers = parse_positive("compositor", "workers", v)?;
        }
        if let Some(v) = section.get("keep_partial") {
            config.compositor.keep_partial = parse_bool(v);
        }
    }

    // [catalog] section
    if let Some(section) = ini.section(Some("catalog")) {
        if let Some(v) = section.get("page_size") {
            let size = parse_positive("catalog", "page_size", v)?;
            config.catalog.page_size = u32::try_from(size).map_err(|_| {
                ConfigFileError::InvalidValue {
                    section: "catalog".to_string(),
                    key: "page_size".to_string(),
                    value: v.to_string(),
                    reason: "value too large".to_string(),
                }
            })?;
        }
        if let Some(v) = non_empty(section.get("sort")) {
            config.catalog.sort = v.to_string();
        }
        if let Some(v) = section.get("limit") {
            config.catalog.limit = v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "catalog".to_string(),
                key: "limit".to_string(),
                value: v.to_string(),
                reason: "must be a non-negative integer".to_string(),
            })?;
        }
    }

    // [endpoints] section
    if let Some(section) = ini.section(Some("endpoints")) {
        if let Some(v) = non_empty(section.get("asset_delivery")) {
            config.endpoints.asset_delivery = parse_url("asset_delivery", v)?;
        }
        if let Some(v) = non_empty(section.get("catalog_search")) {
            config.endpoints.catalog_search = parse_url("catalog_search", v)?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section.get("file")) {
            config.logging.file = expand_tilde(v);
        }
    }

    Ok(config)
}

/// Trims a value and drops it if blank.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_positive(section: &str, key: &str, value: &str) -> Result<usize, ConfigFileError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be a positive integer".to_string(),
        }),
    }
}

fn parse_url(key: &str, value: &str) -> Result<String, ConfigFileError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value.to_string())
    } else {
        Err(ConfigFileError::InvalidValue {
            section: "endpoints".to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be an http:// or https:// URL".to_string(),
        })
    }
}

pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

//! Renames downloaded artifacts after their catalog names.
//!
//! An external scraper saves the group catalog as
//! `{"items": [{"name": "..."}, ...]}`. Artifacts are matched to items by
//! position: the i-th `.png` file in file-name order gets the i-th name.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ARTIFACT_EXTENSION;

/// Errors from catalog-driven renaming.
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("failed to read catalog {}: {source}", path.display())]
    ReadCatalog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed catalog {}: {message}", path.display())]
    ParseCatalog { path: PathBuf, message: String },

    #[error("failed to list {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to rename {} to {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    items: Vec<NamedItem>,
}

#[derive(Debug, Deserialize)]
struct NamedItem {
    name: String,
}

/// File name for a catalog item name: spaces become `_`, `*` is dropped.
pub fn sanitized_file_name(name: &str) -> String {
    let stem: String = name
        .chars()
        .filter(|c| *c != '*')
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();
    format!("{}.{}", stem, ARTIFACT_EXTENSION)
}

/// Renames artifacts in `assets_dir` after the items in `catalog_json`.
///
/// Files beyond the number of items are left alone. Returns the
/// `(old, new)` path of every rename performed.
pub fn rename_from_catalog(
    catalog_json: &Path,
    assets_dir: &Path,
) -> Result<Vec<(PathBuf, PathBuf)>, RenameError> {
    let contents = fs::read_to_string(catalog_json).map_err(|source| RenameError::ReadCatalog {
        path: catalog_json.to_path_buf(),
        source,
    })?;
    let catalog: CatalogFile =
        serde_json::from_str(&contents).map_err(|e| RenameError::ParseCatalog {
            path: catalog_json.to_path_buf(),
            message: e.to_string(),
        })?;

    let files = list_artifacts(assets_dir)?;
    debug!(
        items = catalog.items.len(),
        files = files.len(),
        "Matching artifacts to catalog items"
    );

    let mut renamed = Vec::new();
    for (old_path, item) in files.into_iter().zip(catalog.items.iter()) {
        let new_path = assets_dir.join(sanitized_file_name(&item.name));
        fs::rename(&old_path, &new_path).map_err(|source| RenameError::Rename {
            from: old_path.clone(),
            to: new_path.clone(),
            source,
        })?;
        info!(from = %old_path.display(), to = %new_path.display(), "Renamed artifact");
        renamed.push((old_path, new_path));
    }

    Ok(renamed)
}

/// Lists `.png` files in `dir`, sorted by file name.
fn list_artifacts(dir: &Path) -> Result<Vec<PathBuf>, RenameError> {
    let read_dir_error = |source: io::Error| RenameError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };
    let suffix = format!(".{}", ARTIFACT_EXTENSION);

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        let is_artifact = entry.file_name().to_string_lossy().ends_with(&suffix);
        if is_artifact && entry.path().is_file() {
            files.push(entry.path());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

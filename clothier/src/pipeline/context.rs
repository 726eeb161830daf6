//! Run-scoped metadata.

use std::collections::HashMap;

use crate::asset::{AssetId, TypeLabel};
use crate::catalog::CatalogItem;

/// Type labels known for the assets of one run.
///
/// Built by group mode from the catalog listing and discarded when the run
/// ends. Direct-asset runs use an empty context, so every artifact is
/// labelled `Unknown`.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    labels: HashMap<AssetId, TypeLabel>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a context from catalog items. Later duplicates win.
    pub fn from_items(items: &[CatalogItem]) -> Self {
        let labels = items
            .iter()
            .map(|item| (item.asset_id.clone(), item.type_label.clone()))
            .collect();
        Self { labels }
    }

    /// Label for an asset, `Unknown` when the run never saw it listed.
    pub fn label_for(&self, asset_id: &AssetId) -> TypeLabel {
        self.labels
            .get(asset_id)
            .cloned()
            .unwrap_or_else(TypeLabel::unknown)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

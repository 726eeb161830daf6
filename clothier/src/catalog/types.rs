//! Catalog listing data types.

use serde::Deserialize;

use crate::asset::{type_label_for_code, AssetId, TypeLabel};

/// One listed asset with its type label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub asset_id: AssetId,
    pub type_label: TypeLabel,
}

impl CatalogItem {
    pub fn new(asset_id: AssetId, type_label: TypeLabel) -> Self {
        Self {
            asset_id,
            type_label,
        }
    }
}

/// One page of the catalog search response.
///
/// Only the fields the paginator uses are deserialized.
#[derive(Debug, Deserialize)]
pub(crate) struct CatalogPage {
    #[serde(default)]
    pub data: Vec<CatalogRecord>,
    #[serde(default, rename = "nextPageCursor")]
    pub next_page_cursor: Option<String>,
}

impl CatalogPage {
    /// Cursor for the following page. Empty strings count as absent.
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_page_cursor
            .as_deref()
            .filter(|cursor| !cursor.is_empty())
    }
}

/// Raw listing entry. The type code arrives under either key depending on
/// the item kind.
#[derive(Debug, Deserialize)]
pub(crate) struct CatalogRecord {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default, rename = "assetType")]
    pub asset_type: Option<u32>,
    #[serde(default, rename = "assetTypeId")]
    pub asset_type_id: Option<u32>,
}

impl CatalogRecord {
    /// Converts to a [`CatalogItem`]; `None` when the entry has no id.
    pub fn into_item(self) -> Option<CatalogItem> {
        let id = self.id?;
        let code = self
            .asset_type
            .filter(|code| *code != 0)
            .or(self.asset_type_id);
        let label = code.map(type_label_for_code).unwrap_or_default();
        Some(CatalogItem::new(AssetId::from(id), label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_deserialize() {
        let json = r#"{
            "keyword": null,
            "previousPageCursor": null,
            "nextPageCursor": "abc",
            "data": [
                {"id": 101, "itemType": "Asset", "assetType": 11, "name": "Red Shirt"},
                {"id": 102, "itemType": "Asset", "assetTypeId": 12},
                {"id": 103, "assetType": 2}
            ]
        }"#;

        let page: CatalogPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.next_cursor(), Some("abc"));

        let items: Vec<CatalogItem> = page
            .data
            .into_iter()
            .filter_map(CatalogRecord::into_item)
            .collect();
        assert_eq!(
            items,
            vec![
                CatalogItem::new(AssetId::from("101"), TypeLabel::new("Shirt")),
                CatalogItem::new(AssetId::from("102"), TypeLabel::new("Pants")),
                CatalogItem::new(AssetId::from("103"), TypeLabel::new("Type2")),
            ]
        );
    }

    #[test]
    fn test_empty_or_null_cursor_is_absent() {
        let page: CatalogPage = serde_json::from_str(r#"{"data": [], "nextPageCursor": ""}"#).unwrap();
        assert_eq!(page.next_cursor(), None);

        let page: CatalogPage = serde_json::from_str(r#"{"data": [], "nextPageCursor": null}"#).unwrap();
        assert_eq!(page.next_cursor(), None);

        let page: CatalogPage = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(page.next_cursor(), None);
        assert!(page.data.is_empty());
    }

    #[test]
    fn test_record_without_type_is_unknown() {
        let record: CatalogRecord = serde_json::from_str(r#"{"id": 5}"#).unwrap();
        let item = record.into_item().unwrap();
        assert_eq!(item.type_label, TypeLabel::unknown());
    }

    #[test]
    fn test_record_without_id_is_skipped() {
        let record: CatalogRecord = serde_json::from_str(r#"{"assetType": 11}"#).unwrap();
        assert!(record.into_item().is_none());
    }

    #[test]
    fn test_zero_asset_type_falls_back_to_type_id() {
        let record: CatalogRecord =
            serde_json::from_str(r#"{"id": 5, "assetType": 0, "assetTypeId": 12}"#).unwrap();
        assert_eq!(record.into_item().unwrap().type_label.as_str(), "Pants");
    }
}

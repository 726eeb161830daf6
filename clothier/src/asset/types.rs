//! Asset, texture and type-label value types.

use std::fmt;

/// Catalog asset type code for shirts.
pub const SHIRT_TYPE_CODE: u32 = 11;

/// Catalog asset type code for pants.
pub const PANTS_TYPE_CODE: u32 = 12;

/// Opaque identifier of a remote catalog asset.
///
/// Numeric ids from the catalog are kept in their decimal string form so
/// that ids supplied on the command line and ids discovered by pagination
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(String);

impl AssetId {
    /// Creates an asset id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for a non-empty run of ASCII digits.
    ///
    /// Only such ids are safe to place in a request query and a file name.
    pub fn is_numeric(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit())
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AssetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for AssetId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Content identifier returned by the resolver.
///
/// Only ever used to key the fetch for the asset it was resolved from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureId(String);

impl TextureId {
    /// Creates a texture id from its captured numeric text.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human-readable classification of an asset, used in artifact file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeLabel(String);

impl TypeLabel {
    /// Label used when no type information is known for an asset.
    pub fn unknown() -> Self {
        Self("Unknown".to_string())
    }

    /// Creates a label from arbitrary text.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TypeLabel {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for TypeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps a catalog asset type code to its label.
///
/// Codes outside the static table get a synthesized `Type{code}` label.
pub fn type_label_for_code(code: u32) -> TypeLabel {
    match code {
        SHIRT_TYPE_CODE => TypeLabel::new("Shirt"),
        PANTS_TYPE_CODE => TypeLabel::new("Pants"),
        other => TypeLabel::new(format!("Type{}", other)),
    }
}

//! Asset identity types.
//!
//! An asset is a single clothing item in the remote catalog. It is known by
//! its [`AssetId`], classified by a [`TypeLabel`], and its image bytes live
//! under a separate [`TextureId`] discovered by the resolver.

mod types;

pub use types::{
    type_label_for_code, AssetId, TextureId, TypeLabel, PANTS_TYPE_CODE, SHIRT_TYPE_CODE,
};

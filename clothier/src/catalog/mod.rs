//! Group catalog access.
//!
//! [`paginate_catalog`] discovers the clothing items a group has listed,
//! producing the asset ids and type labels that drive a group-mode run.
//! [`rename_from_catalog`] renames finished artifacts after a catalog file
//! saved by an external scraper.

mod paginator;
mod rename;
mod types;

pub use paginator::{page_url, paginate_catalog, CatalogError, CatalogQuery};
pub use rename::{rename_from_catalog, sanitized_file_name, RenameError};
pub use types::CatalogItem;

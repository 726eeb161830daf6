//! Catalog paginator - walks the group clothing listing page by page.

use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::types::{CatalogItem, CatalogPage, CatalogRecord};
use crate::http::{AsyncHttpClient, HttpError};
use crate::pipeline::ConcurrencyLimiter;

/// Errors from catalog pagination.
///
/// Any of these ends pagination with an error; only an absent cursor ends
/// it normally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The listing URL could not be built
    #[error("invalid catalog URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    /// A page request failed
    #[error("catalog request failed: {0}")]
    Http(#[from] HttpError),

    /// A page body was not the expected JSON
    #[error("malformed catalog response: {0}")]
    Json(String),
}

/// What to list and how much of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub group_id: String,
    pub sort: String,
    pub limit: usize,
    pub page_size: u32,
}

impl CatalogQuery {
    pub fn new(group_id: impl Into<String>, sort: impl Into<String>, limit: usize) -> Self {
        Self {
            group_id: group_id.into(),
            sort: sort.into(),
            limit,
            page_size: crate::config::DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Builds the URL for one listing page.
pub fn page_url(
    base_url: &str,
    query: &CatalogQuery,
    cursor: Option<&str>,
) -> Result<String, CatalogError> {
    let page_size = query.page_size.to_string();
    let mut params: Vec<(&str, &str)> = vec![
        ("Category", "Clothing"),
        ("CreatorType", "Group"),
        ("CreatorTargetId", query.group_id.as_str()),
        ("SortType", query.sort.as_str()),
        ("limit", page_size.as_str()),
    ];
    if let Some(cursor) = cursor {
        params.push(("cursor", cursor));
    }

    reqwest::Url::parse_with_params(base_url, &params)
        .map(String::from)
        .map_err(|e| CatalogError::InvalidUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })
}

/// Lists up to `query.limit` items in listing order.
///
/// Stops as soon as enough items are collected or the response carries no
/// next cursor. A zero limit issues no request.
#[instrument(skip(client, limiter, base_url), fields(group_id = %query.group_id))]
pub async fn paginate_catalog<C>(
    client: &C,
    limiter: &ConcurrencyLimiter,
    base_url: &str,
    query: &CatalogQuery,
) -> Result<Vec<CatalogItem>, CatalogError>
where
    C: AsyncHttpClient,
{
    let mut items = Vec::with_capacity(query.limit);
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    while items.len() < query.limit {
        let url = page_url(base_url, query, cursor.as_deref())?;

        let body = {
            let _permit = limiter.acquire().await;
            client.get(&url).await?
        };
        pages += 1;

        let page: CatalogPage =
            serde_json::from_slice(&body).map_err(|e| CatalogError::Json(e.to_string()))?;

        let next_cursor = page.next_cursor().map(str::to_owned);
        let listed = page.data.len();
        for record in page.data {
            if items.len() >= query.limit {
                break;
            }
            match CatalogRecord::into_item(record) {
                Some(item) => items.push(item),
                None => warn!(page = pages, "Skipping catalog entry without an id"),
            }
        }

        debug!(page = pages, listed, collected = items.len(), "Catalog page processed");

        match next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    debug!(
        group_id = %query.group_id,
        pages,
        items = items.len(),
        "Catalog listing complete"
    );

    Ok(items)
}

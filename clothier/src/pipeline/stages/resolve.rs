//! Resolve stage - maps an asset id to the texture id holding its image.
//!
//! The asset delivery endpoint answers with a small XML document whose
//! exact shape varies between assets. The body is scanned as text for a
//! texture reference, trying the known shapes in a fixed order.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, error, instrument};

use crate::asset::{AssetId, TextureId};
use crate::http::AsyncHttpClient;
use crate::pipeline::{ConcurrencyLimiter, StageError};

/// Texture reference patterns, most specific first.
fn texture_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();

    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"<url>https?://www\.roblox\.com/asset/\?id=(\d+)</url>").unwrap(),
            Regex::new(r"https?://www\.roblox\.com/asset/\?id=(\d+)").unwrap(),
            Regex::new(r"rbxassetid://(\d+)").unwrap(),
        ]
    })
}

/// Extracts the texture id from a resolution response body.
///
/// The first pattern that matches anywhere in the body wins, even if a
/// lower-priority pattern matches earlier in the text.
pub fn extract_texture_id(body: &str) -> Option<TextureId> {
    texture_patterns()
        .iter()
        .find_map(|pattern| pattern.captures(body))
        .and_then(|captures| captures.get(1))
        .map(|id| TextureId::new(id.as_str()))
}

/// Builds the asset delivery URL for an id.
pub(crate) fn delivery_url(base_url: &str, id: &str) -> String {
    format!("{}?id={}", base_url, id)
}

/// Resolves one asset to its texture id.
///
/// Issues a single request under the network limiter. Ids that are not
/// decimal numbers are rejected without a request. Failures are logged here
/// and returned; they never abort the batch.
#[instrument(skip(client, limiter, base_url), fields(asset_id = %asset_id))]
pub async fn resolve_stage<C>(
    asset_id: &AssetId,
    client: &C,
    limiter: &ConcurrencyLimiter,
    base_url: &str,
) -> Result<TextureId, StageError>
where
    C: AsyncHttpClient,
{
    if !asset_id.is_numeric() {
        error!(asset_id = %asset_id, "Rejected non-numeric asset id");
        return Err(StageError::InvalidAssetId(asset_id.to_string()));
    }

    let url = delivery_url(base_url, asset_id.as_str());

    let body = {
        let _permit = limiter.acquire().await;
        client.get(&url).await
    };

    let body = match body {
        Ok(body) => body,
        Err(e) => {
            error!(asset_id = %asset_id, error = %e, "Failed to resolve asset");
            return Err(StageError::ResolveRequest(e));
        }
    };

    match extract_texture_id(&String::from_utf8_lossy(&body)) {
        Some(texture_id) => {
            debug!(asset_id = %asset_id, texture_id = %texture_id, "Asset resolved");
            Ok(texture_id)
        }
        None => {
            error!(asset_id = %asset_id, "No texture id found in resolution response");
            Err(StageError::NoTextureId)
        }
    }
}

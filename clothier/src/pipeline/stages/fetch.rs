//! Fetch stage - downloads the raw texture bytes.

use tracing::{debug, error, instrument};

use super::resolve::delivery_url;
use crate::asset::{AssetId, TextureId};
use crate::http::AsyncHttpClient;
use crate::pipeline::{ConcurrencyLimiter, StageError};

/// Downloads the bytes for a resolved texture.
///
/// One request under the network limiter, no retry. Nothing is written to
/// disk here, so a failed fetch leaves no file behind.
#[instrument(skip(client, limiter, base_url), fields(asset_id = %asset_id, texture_id = %texture_id))]
pub async fn fetch_stage<C>(
    asset_id: &AssetId,
    texture_id: &TextureId,
    client: &C,
    limiter: &ConcurrencyLimiter,
    base_url: &str,
) -> Result<Vec<u8>, StageError>
where
    C: AsyncHttpClient,
{
    let url = delivery_url(base_url, texture_id.as_str());

    let result = {
        let _permit = limiter.acquire().await;
        client.get(&url).await
    };

    match result {
        Ok(bytes) => {
            debug!(
                asset_id = %asset_id,
                texture_id = %texture_id,
                size_bytes = bytes.len(),
                "Texture downloaded"
            );
            Ok(bytes)
        }
        Err(e) => {
            error!(
                asset_id = %asset_id,
                texture_id = %texture_id,
                error = %e,
                "Failed to download texture"
            );
            Err(StageError::Fetch(e))
        }
    }
}

//! Retrieves raw image bytes through an ordered fallback chain.
//!
//! GitHub's contents API silently omits inline content above a size
//! ceiling, which forces a blob-by-id lookup; some edge cases omit blob
//! content as well, leaving the download URL as a last resort. The tiers
//! are expressed as an ordered slice so adding or reordering one is a data
//! change, and each tier is independently testable.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use tracing::{info, warn};

use crate::github::error::GatewayError;
use crate::github::gateway::GitHubGateway;
use crate::github::locator::PullRequestLocator;
use crate::github::models::ContentEntry;

/// Content type for every proxied image.
pub const IMAGE_CONTENT_TYPE: &str = "image/png";

/// One strategy in the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    /// Base64 content inlined in the contents-API response.
    Inline,
    /// Blob lookup by the content id the contents response names.
    Blob,
    /// Raw fetch of the response's download URL, following redirects.
    Redirect,
}

/// Evaluation order. A tier is attempted only when every prior tier
/// produced no bytes.
const TIERS: [Tier; 3] = [Tier::Inline, Tier::Blob, Tier::Redirect];

/// Fetches raw image bytes for a file at a specific ref.
pub struct ImageRetrieval {
    gateway: Arc<dyn GitHubGateway>,
}

impl ImageRetrieval {
    /// Creates a retrieval pipeline over the given gateway.
    #[must_use]
    pub fn new(gateway: Arc<dyn GitHubGateway>) -> Self {
        Self { gateway }
    }

    /// Retrieves the bytes of `path` at `git_ref`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UpstreamStatus`] when the contents call does
    /// not succeed (a 404/403 there is authoritative, no fallback is
    /// attempted), [`GatewayError::NotRetrievable`] when every tier was
    /// tried and none produced bytes, and [`GatewayError::Network`] or
    /// [`GatewayError::Decode`] on transport or decoding faults.
    pub async fn fetch(
        &self,
        locator: &PullRequestLocator,
        path: &str,
        git_ref: &str,
    ) -> Result<Bytes, GatewayError> {
        let entry = match self.gateway.file_content(locator, path, git_ref).await {
            Ok(entry) => entry,
            Err(error) => {
                warn!(path, git_ref = short_ref(git_ref), %error, "content fetch failed");
                return Err(error);
            }
        };

        for tier in TIERS {
            if let Some(bytes) = self.attempt(tier, locator, path, &entry).await? {
                return Ok(bytes);
            }
        }

        warn!(
            path,
            git_ref = short_ref(git_ref),
            encoding = entry.encoding.as_deref(),
            sha = entry.sha.as_deref(),
            "image retrieval exhausted every tier"
        );
        Err(GatewayError::NotRetrievable)
    }

    async fn attempt(
        &self,
        tier: Tier,
        locator: &PullRequestLocator,
        path: &str,
        entry: &ContentEntry,
    ) -> Result<Option<Bytes>, GatewayError> {
        match tier {
            Tier::Inline => {
                decode_inline(entry.encoding.as_deref(), entry.content.as_deref())
            }
            Tier::Blob => {
                let Some(sha) = entry.sha.as_deref() else {
                    return Ok(None);
                };
                let Some(blob) = self.gateway.blob(locator, sha).await? else {
                    return Ok(None);
                };
                decode_inline(blob.encoding.as_deref(), blob.content.as_deref())
            }
            Tier::Redirect => {
                let Some(url) = entry.download_url.as_deref() else {
                    return Ok(None);
                };
                info!(path, size = entry.size, "falling back to download URL");
                self.gateway.download(url).await
            }
        }
    }
}

/// Decodes an inline base64 payload when the encoding marker says there is
/// one; `None` means "this tier does not apply", not an error.
fn decode_inline(
    encoding: Option<&str>,
    content: Option<&str>,
) -> Result<Option<Bytes>, GatewayError> {
    if encoding != Some("base64") {
        return Ok(None);
    }
    let Some(content) = content else {
        return Ok(None);
    };

    // GitHub wraps base64 bodies in newlines.
    let compact: String = content.split_whitespace().collect();
    BASE64
        .decode(compact.as_bytes())
        .map(|raw| Some(Bytes::from(raw)))
        .map_err(|error| GatewayError::Decode {
            message: format!("inline content: {error}"),
        })
}

fn short_ref(git_ref: &str) -> &str {
    git_ref.get(..12).unwrap_or(git_ref)
}

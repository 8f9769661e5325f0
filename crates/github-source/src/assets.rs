//! Asset downloads over HTTP

use std::time::Duration;

use archive_core::{ArchiveError, AssetResponse, AssetTransport};
use ureq::Agent;

/// Default per-request timeout for asset downloads
pub const DEFAULT_ASSET_TIMEOUT: Duration = Duration::from_secs(5);

/// Largest asset body accepted
const MAX_ASSET_BYTES: u64 = 64 * 1024 * 1024;

/// [`AssetTransport`] backed by a ureq agent
///
/// Every request is bounded by the configured timeout. Error statuses come
/// back as responses so the caller decides how to report them.
pub struct HttpAssetTransport {
    agent: Agent,
}

impl HttpAssetTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }
}

impl Default for HttpAssetTransport {
    fn default() -> Self {
        Self::new(DEFAULT_ASSET_TIMEOUT)
    }
}

impl AssetTransport for HttpAssetTransport {
    fn get(&self, url: &str, bearer_token: Option<&str>) -> archive_core::Result<AssetResponse> {
        let fetch_error = |message: String| ArchiveError::AssetFetch {
            url: url.to_string(),
            message,
        };

        let mut request = self.agent.get(url);
        if let Some(token) = bearer_token {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }

        let mut response = request
            .call()
            .map_err(|e| fetch_error(format!("making request: {}", e)))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_ASSET_BYTES)
            .read_to_vec()
            .map_err(|e| fetch_error(format!("reading response body: {}", e)))?;

        Ok(AssetResponse {
            status,
            content_type,
            body,
        })
    }
}

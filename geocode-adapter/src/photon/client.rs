//! Photon HTTP client.

use serde_json::Value;

use crate::config::AdapterConfig;

use super::error::PhotonError;

/// Maximum number of body characters kept in error messages.
const MAX_ERROR_BODY: usize = 500;

/// Client for a Photon geocoder instance.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct PhotonClient {
    http: reqwest::Client,
    base_url: String,
}

impl PhotonClient {
    /// Create a new Photon client from the adapter configuration.
    pub fn new(config: &AdapterConfig) -> Result<Self, PhotonError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.photon_url.clone(),
        })
    }

    /// Base URL every outbound request is built from.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a fully built Photon URL and decode the JSON body.
    ///
    /// The URL is sent as-is; query values were already encoded by the
    /// request translator.
    ///
    /// A JSON body is returned whatever the status, so Photon's
    /// `{"message": ..}` error replies reach the response translator like
    /// any other result. Only a non-success reply without a JSON body is
    /// reported as [`PhotonError::Api`].
    pub async fn fetch(&self, url: &str) -> Result<Value, PhotonError> {
        tracing::debug!(%url, "querying photon");

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "photon returned an error status");
            return serde_json::from_str(&body).map_err(|_| PhotonError::Api {
                status: status.as_u16(),
                message: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| PhotonError::Json {
            message: e.to_string(),
        })
    }
}

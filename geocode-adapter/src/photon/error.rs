//! Photon client error types.

/// Errors that can occur when talking to the Photon service.
#[derive(Debug, thiserror::Error)]
pub enum PhotonError {
    /// HTTP request failed (connection refused, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Photon answered with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not valid JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },
}

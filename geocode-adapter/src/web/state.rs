//! Application state for the web layer.

use std::sync::Arc;

use crate::photon::PhotonClient;

/// Shared application state.
///
/// Read-only after startup; handlers never mutate it.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Upstream Photon client
    pub photon: Arc<PhotonClient>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(photon: PhotonClient) -> Self {
        Self {
            photon: Arc::new(photon),
        }
    }
}

//! Data transfer objects for web responses.
//!
//! Successful responses are the translated feature collections themselves
//! (`serde_json::Value`), so only the error body needs a type.

use serde::{Deserialize, Serialize};

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

//! Wire models for API responses.

use serde::{Deserialize, Serialize};

pub use lamina_core::models::item::Item;

/// `GET /` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

/// Error body returned for every non-2xx response produced by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

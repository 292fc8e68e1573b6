use axum::Json;

use crate::models::RootResponse;

/// `GET /` — greeting.
pub async fn read_root() -> Json<RootResponse> {
    Json(RootResponse {
        message: lamina_core::greeting::root_message().to_string(),
    })
}

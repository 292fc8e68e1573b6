//! Item lookup endpoint.

use axum::Json;
use axum::extract::{Extension, Path};
use lamina_core::items::{Item, parse_item_id};
use tracing::debug;

use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;

/// `GET /api/items/{item_id}` — echoes the item id.
///
/// `item_id` is taken as a raw segment so a non-integer yields the API's
/// JSON error body rather than axum's plain-text rejection.
pub async fn read_item(
    Path(raw_id): Path<String>,
    user: Option<Extension<AuthenticatedUser>>,
) -> AppResult<Json<Item>> {
    let item_id = parse_item_id(&raw_id)?;
    if let Some(Extension(AuthenticatedUser(claims))) = &user {
        debug!(item_id, sub = %claims.sub, "item lookup");
    }
    Ok(Json(Item::lookup(item_id)))
}

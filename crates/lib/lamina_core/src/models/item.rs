use serde::{Deserialize, Serialize};

/// An item as returned by `GET /api/items/{item_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: i64,
    pub name: String,
}

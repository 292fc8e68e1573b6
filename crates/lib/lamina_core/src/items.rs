//! Item lookup.
//!
//! There is no item store: a lookup echoes the requested id back with a
//! derived display name.

use thiserror::Error;

pub use crate::models::item::Item;

/// Rejected `item_id` path parameter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemIdError {
    #[error("item_id is empty")]
    Empty,

    #[error("item_id must be an integer, got '{0}'")]
    NotAnInteger(String),

    #[error("item_id '{0}' is out of range")]
    OutOfRange(String),
}

/// Parse the raw `item_id` path segment as a signed 64-bit integer.
pub fn parse_item_id(raw: &str) -> Result<i64, ItemIdError> {
    use std::num::IntErrorKind;

    if raw.is_empty() {
        return Err(ItemIdError::Empty);
    }
    raw.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ItemIdError::OutOfRange(raw.to_string())
        }
        _ => ItemIdError::NotAnInteger(raw.to_string()),
    })
}

impl Item {
    /// Echo lookup: every integer id resolves to `Item {id}`.
    pub fn lookup(item_id: i64) -> Self {
        Self {
            item_id,
            name: format!("Item {item_id}"),
        }
    }
}

//! Restaurant photo models and DTOs.

use savor_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

/// A row from the `restaurant_images` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "store", derive(sqlx::FromRow))]
pub struct RestaurantImage {
    pub id: DbId,
    pub restaurant_id: DbId,
    /// Public locator issued by the blob store.
    pub url: String,
    /// Ordinal position `1..=5`; slot 1 is the cover.
    pub slot: i32,
    pub created_at: Timestamp,
}

/// DTO for inserting a photo into a specific slot.
#[derive(Debug, Clone)]
pub struct CreateRestaurantImage {
    pub restaurant_id: DbId,
    pub url: String,
    pub slot: i32,
}

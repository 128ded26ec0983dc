//! Category models and DTOs.

use savor_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

/// A row from the `categories` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "store", derive(sqlx::FromRow))]
pub struct Category {
    pub id: DbId,
    pub name: String,
    /// `false` for the built-in defaults, which cannot be deleted.
    pub is_custom: bool,
    pub created_at: Timestamp,
}

/// A category joined with one restaurant it is linked to.
#[cfg(feature = "store")]
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LinkedCategory {
    pub restaurant_id: DbId,
    #[sqlx(flatten)]
    pub category: Category,
}

/// DTO for explicitly creating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
}

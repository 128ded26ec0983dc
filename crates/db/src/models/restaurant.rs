//! Restaurant models, DTOs and list filter.

use savor_core::listing;
use savor_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::models::category::Category;
use crate::models::image::RestaurantImage;

// ---------------------------------------------------------------------------
// Entity structs
// ---------------------------------------------------------------------------

/// A row from the `restaurants` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "store", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: DbId,
    pub name: String,
    pub note: Option<String>,
    /// Star rating in `[1, 5]`; `None` means unrated.
    pub rating: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A restaurant with its categories (by name) and photos (by slot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantWithRelations {
    pub id: DbId,
    pub name: String,
    pub note: Option<String>,
    pub rating: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub categories: Vec<Category>,
    pub images: Vec<RestaurantImage>,
}

impl RestaurantWithRelations {
    /// Assemble from a row and its relations, applying the canonical ordering.
    pub fn from_parts(
        restaurant: Restaurant,
        mut categories: Vec<Category>,
        mut images: Vec<RestaurantImage>,
    ) -> Self {
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        images.sort_by_key(|image| image.slot);

        Self {
            id: restaurant.id,
            name: restaurant.name,
            note: restaurant.note,
            rating: restaurant.rating,
            created_at: restaurant.created_at,
            updated_at: restaurant.updated_at,
            categories,
            images,
        }
    }

    pub fn category_ids(&self) -> impl Iterator<Item = DbId> + '_ {
        self.categories.iter().map(|c| c.id)
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for inserting a restaurant. Fields are expected to be validated.
#[derive(Debug, Clone)]
pub struct CreateRestaurant {
    pub name: String,
    pub note: Option<String>,
    pub category_ids: Vec<DbId>,
}

/// DTO for an in-place update. The category set is replaced wholesale.
#[derive(Debug, Clone)]
pub struct UpdateRestaurant {
    pub name: String,
    pub note: Option<String>,
    pub category_ids: Vec<DbId>,
}

/// Filter applied to restaurant listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantFilter {
    /// Case-insensitive name substring.
    pub search: Option<String>,
    /// Restaurant must carry any of these categories.
    pub category_ids: Vec<DbId>,
    /// Minimum rating; unrated restaurants count as zero.
    pub min_rating: Option<f64>,
}

impl RestaurantFilter {
    /// `true` when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.normalized_search().is_none()
            && self.category_ids.is_empty()
            && self.min_rating.is_none()
    }

    pub fn normalized_search(&self) -> Option<String> {
        listing::normalize_search(self.search.as_deref())
    }

    /// Evaluate the filter in memory.
    pub fn matches(&self, restaurant: &RestaurantWithRelations) -> bool {
        let needle = self.normalized_search();
        listing::name_matches(&restaurant.name, needle.as_deref())
            && listing::categories_match(&self.category_ids, restaurant.category_ids())
            && listing::rating_meets(restaurant.rating, self.min_rating)
    }
}

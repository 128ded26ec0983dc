//! Dashboard filters over the projected restaurant list.
//!
//! Semantics match the server's list filter. Categories that only exist as
//! pending placeholders never match a category-id selection.

use savor_core::listing;
use savor_core::types::DbId;

use crate::optimistic::OptimisticRestaurant;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    pub search: Option<String>,
    pub category_ids: Vec<DbId>,
    pub min_rating: Option<f64>,
}

impl ListFilter {
    pub fn has_filters(&self) -> bool {
        listing::normalize_search(self.search.as_deref()).is_some()
            || !self.category_ids.is_empty()
            || self.min_rating.is_some()
    }

    pub fn matches(&self, restaurant: &OptimisticRestaurant) -> bool {
        let needle = listing::normalize_search(self.search.as_deref());
        let persisted_ids = restaurant
            .categories
            .iter()
            .filter_map(|c| c.key.persisted_id());

        listing::name_matches(&restaurant.name, needle.as_deref())
            && listing::categories_match(&self.category_ids, persisted_ids)
            && listing::rating_meets(restaurant.rating, self.min_rating)
    }

    /// The matching entries, order preserved.
    pub fn apply<'a>(
        &self,
        restaurants: &'a [OptimisticRestaurant],
    ) -> Vec<&'a OptimisticRestaurant> {
        restaurants.iter().filter(|r| self.matches(r)).collect()
    }
}

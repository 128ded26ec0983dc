//! Restaurant list filtering predicates.
//!
//! Shared by the in-process store and the client dashboard so both agree on
//! what a filtered list contains.

use crate::types::DbId;

/// Lowercased, trimmed search text; `None` when there is nothing to match.
pub fn normalize_search(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

/// Case-insensitive substring match on the restaurant name.
///
/// `needle` must already be normalized with [`normalize_search`].
pub fn name_matches(name: &str, needle: Option<&str>) -> bool {
    needle.map_or(true, |n| name.to_lowercase().contains(n))
}

/// Restaurant carries at least one of the selected categories.
///
/// An empty selection matches everything.
pub fn categories_match<I>(selected: &[DbId], category_ids: I) -> bool
where
    I: IntoIterator<Item = DbId>,
{
    if selected.is_empty() {
        return true;
    }
    category_ids.into_iter().any(|id| selected.contains(&id))
}

/// Rating is at least `min_rating`; unrated restaurants count as zero.
pub fn rating_meets(rating: Option<f64>, min_rating: Option<f64>) -> bool {
    min_rating.map_or(true, |min| rating.unwrap_or(0.0) >= min)
}

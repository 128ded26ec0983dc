//! Shared query parameter types for API handlers.

use savor_core::types::DbId;
use savor_db::models::restaurant::RestaurantFilter;
use serde::Deserialize;

use crate::error::AppError;

/// Query parameters for `GET /restaurants`
/// (`?search=&category_ids=1,2&min_rating=`).
#[derive(Debug, Default, Deserialize)]
pub struct RestaurantListQuery {
    pub search: Option<String>,
    /// Comma-separated category ids.
    pub category_ids: Option<String>,
    pub min_rating: Option<f64>,
}

impl RestaurantListQuery {
    /// Parse into a [`RestaurantFilter`], rejecting malformed ids.
    pub fn into_filter(self) -> Result<RestaurantFilter, AppError> {
        let category_ids = match self.category_ids.as_deref() {
            Some(raw) => parse_id_list(raw)?,
            None => Vec::new(),
        };

        if let Some(min) = self.min_rating {
            if !min.is_finite() {
                return Err(AppError::BadRequest(
                    "min_rating must be a finite number".into(),
                ));
            }
        }

        Ok(RestaurantFilter {
            search: self.search,
            category_ids,
            min_rating: self.min_rating,
        })
    }
}

fn parse_id_list(raw: &str) -> Result<Vec<DbId>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<DbId>()
                .map_err(|_| AppError::BadRequest(format!("Invalid category id '{part}'")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn csv_ids_are_parsed() {
        let filter = RestaurantListQuery {
            category_ids: Some("1, 2,,3".into()),
            ..Default::default()
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.category_ids, vec![1, 2, 3]);
    }

    #[test]
    fn malformed_id_rejected() {
        let result = RestaurantListQuery {
            category_ids: Some("1,abc".into()),
            ..Default::default()
        }
        .into_filter();
        assert_matches!(result, Err(AppError::BadRequest(_)));
    }

    #[test]
    fn empty_query_is_empty_filter() {
        let filter = RestaurantListQuery::default().into_filter().unwrap();
        assert!(filter.is_empty());
    }
}

//! Repository for the `restaurants` table.

use savor_core::types::DbId;
use sqlx::PgPool;

use crate::models::image::RestaurantImage;
use crate::models::restaurant::{CreateRestaurant, Restaurant, RestaurantFilter, UpdateRestaurant};
use crate::repositories::{CategoryRepo, RestaurantImageRepo};

/// Column list for `restaurants` queries.
const COLUMNS: &str = "id, name, note, rating, created_at, updated_at";

/// Provides CRUD operations for restaurants.
pub struct RestaurantRepo;

impl RestaurantRepo {
    /// Insert a restaurant and link its categories in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateRestaurant) -> Result<Restaurant, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO restaurants (name, note) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        let restaurant = sqlx::query_as::<_, Restaurant>(&query)
            .bind(&input.name)
            .bind(&input.note)
            .fetch_one(&mut *tx)
            .await?;

        if !input.category_ids.is_empty() {
            CategoryRepo::set_links_inner(&mut tx, restaurant.id, &input.category_ids).await?;
        }

        tx.commit().await?;
        Ok(restaurant)
    }

    /// Find a restaurant by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Restaurant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM restaurants WHERE id = $1");
        sqlx::query_as::<_, Restaurant>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List restaurants matching `filter`, newest first.
    pub async fn list(pool: &PgPool, filter: &RestaurantFilter) -> Result<Vec<Restaurant>, sqlx::Error> {
        let pattern = filter
            .normalized_search()
            .map(|needle| format!("%{}%", escape_like(&needle)));

        let query = format!(
            "SELECT {COLUMNS} FROM restaurants r \
             WHERE ($1::text IS NULL OR r.name ILIKE $1 ESCAPE '\\') \
               AND (cardinality($2::bigint[]) = 0 OR EXISTS ( \
                    SELECT 1 FROM restaurant_categories rc \
                    WHERE rc.restaurant_id = r.id AND rc.category_id = ANY($2))) \
               AND ($3::float8 IS NULL OR COALESCE(r.rating, 0) >= $3) \
             ORDER BY r.created_at DESC, r.id DESC"
        );
        sqlx::query_as::<_, Restaurant>(&query)
            .bind(pattern)
            .bind(&filter.category_ids)
            .bind(filter.min_rating)
            .fetch_all(pool)
            .await
    }

    /// Update name and note and replace the category set.
    ///
    /// Returns `None` if no restaurant with the given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRestaurant,
    ) -> Result<Option<Restaurant>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE restaurants SET \
                 name = $2, \
                 note = $3, \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let restaurant = sqlx::query_as::<_, Restaurant>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.note)
            .fetch_optional(&mut *tx)
            .await?;

        if restaurant.is_some() {
            CategoryRepo::set_links_inner(&mut tx, id, &input.category_ids).await?;
        }

        tx.commit().await?;
        Ok(restaurant)
    }

    /// Set the star rating.
    ///
    /// Returns `None` if no restaurant with the given ID exists.
    pub async fn set_rating(pool: &PgPool, id: DbId, rating: f64) -> Result<Option<Restaurant>, sqlx::Error> {
        let query = format!(
            "UPDATE restaurants SET rating = $2, updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Restaurant>(&query)
            .bind(id)
            .bind(rating)
            .fetch_optional(pool)
            .await
    }

    /// Delete a restaurant and all of its photo rows atomically.
    ///
    /// Returns the removed photos, or `None` if the restaurant did not exist
    /// (in which case nothing is changed).
    pub async fn delete_with_images(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Vec<RestaurantImage>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let images = RestaurantImageRepo::delete_all_inner(&mut tx, id).await?;

        let result = sqlx::query("DELETE FROM restaurants WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(images))
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(escape_like("sushi bar"), "sushi bar");
    }

    #[test]
    fn metacharacters_are_escaped() {
        assert_eq!(escape_like("100%_fun\\"), "100\\%\\_fun\\\\");
    }
}

//! Repository for the `restaurant_images` table.

use savor_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::image::{CreateRestaurantImage, RestaurantImage};

/// Column list for `restaurant_images` queries.
const COLUMNS: &str = "id, restaurant_id, url, slot, created_at";

/// Provides CRUD operations for restaurant photos.
pub struct RestaurantImageRepo;

impl RestaurantImageRepo {
    /// Insert a photo. Fails with a `uq_restaurant_images_slot` violation if
    /// the slot is already taken.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRestaurantImage,
    ) -> Result<RestaurantImage, sqlx::Error> {
        let query = format!(
            "INSERT INTO restaurant_images (restaurant_id, url, slot) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RestaurantImage>(&query)
            .bind(input.restaurant_id)
            .bind(&input.url)
            .bind(input.slot)
            .fetch_one(pool)
            .await
    }

    /// Find a photo by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<RestaurantImage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM restaurant_images WHERE id = $1");
        sqlx::query_as::<_, RestaurantImage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a restaurant's photos ordered by slot.
    pub async fn list_by_restaurant(
        pool: &PgPool,
        restaurant_id: DbId,
    ) -> Result<Vec<RestaurantImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM restaurant_images \
             WHERE restaurant_id = $1 \
             ORDER BY slot"
        );
        sqlx::query_as::<_, RestaurantImage>(&query)
            .bind(restaurant_id)
            .fetch_all(pool)
            .await
    }

    /// List photos for several restaurants at once.
    pub async fn list_for_restaurants(
        pool: &PgPool,
        restaurant_ids: &[DbId],
    ) -> Result<Vec<RestaurantImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM restaurant_images \
             WHERE restaurant_id = ANY($1) \
             ORDER BY restaurant_id, slot"
        );
        sqlx::query_as::<_, RestaurantImage>(&query)
            .bind(restaurant_ids)
            .fetch_all(pool)
            .await
    }

    /// Delete the listed photos, ignoring ids owned by other restaurants.
    ///
    /// Returns the rows actually removed.
    pub async fn delete_for_restaurant(
        pool: &PgPool,
        restaurant_id: DbId,
        image_ids: &[DbId],
    ) -> Result<Vec<RestaurantImage>, sqlx::Error> {
        let query = format!(
            "DELETE FROM restaurant_images \
             WHERE restaurant_id = $1 AND id = ANY($2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RestaurantImage>(&query)
            .bind(restaurant_id)
            .bind(image_ids)
            .fetch_all(pool)
            .await
    }

    /// Delete every photo of a restaurant within a transaction.
    pub(crate) async fn delete_all_inner(
        tx: &mut Transaction<'_, Postgres>,
        restaurant_id: DbId,
    ) -> Result<Vec<RestaurantImage>, sqlx::Error> {
        let query = format!(
            "DELETE FROM restaurant_images \
             WHERE restaurant_id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RestaurantImage>(&query)
            .bind(restaurant_id)
            .fetch_all(&mut **tx)
            .await
    }
}

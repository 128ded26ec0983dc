//! Repository for the `categories` table and its restaurant links.

use savor_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::category::{Category, LinkedCategory};

/// Column list for `categories` queries.
const COLUMNS: &str = "id, name, is_custom, created_at";

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a category or return the existing row with the same name.
    ///
    /// `is_custom` only applies to newly inserted rows; an existing row keeps
    /// its flag. The no-op `DO UPDATE` makes `RETURNING` yield the existing
    /// row on conflict.
    pub async fn upsert(pool: &PgPool, name: &str, is_custom: bool) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, is_custom) \
             VALUES ($1, $2) \
             ON CONFLICT (name) DO UPDATE SET name = categories.name \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .bind(is_custom)
            .fetch_one(pool)
            .await
    }

    /// Find a category by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all categories: defaults first, then alphabetically.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY is_custom, name");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Delete a category by ID. Cascade removes every restaurant link.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Categories linked to any of `restaurant_ids`, tagged with the owner.
    pub async fn list_for_restaurants(
        pool: &PgPool,
        restaurant_ids: &[DbId],
    ) -> Result<Vec<LinkedCategory>, sqlx::Error> {
        sqlx::query_as::<_, LinkedCategory>(
            "SELECT rc.restaurant_id, c.id, c.name, c.is_custom, c.created_at \
             FROM restaurant_categories rc \
             JOIN categories c ON c.id = rc.category_id \
             WHERE rc.restaurant_id = ANY($1) \
             ORDER BY c.name",
        )
        .bind(restaurant_ids)
        .fetch_all(pool)
        .await
    }

    /// Replace a restaurant's category links within a transaction.
    pub(crate) async fn set_links_inner(
        tx: &mut Transaction<'_, Postgres>,
        restaurant_id: DbId,
        category_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM restaurant_categories WHERE restaurant_id = $1")
            .bind(restaurant_id)
            .execute(&mut **tx)
            .await?;

        for &category_id in category_ids {
            sqlx::query(
                "INSERT INTO restaurant_categories (restaurant_id, category_id) \
                 VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(restaurant_id)
            .bind(category_id)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}

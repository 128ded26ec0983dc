//! The persistence seam used by the API services.
//!
//! [`RestaurantStore`] is the only way the mutation workflow and category
//! registry touch stored state. Uniqueness of category names and of image
//! slots per restaurant is enforced by implementations, never by callers.

use std::collections::HashMap;

use async_trait::async_trait;
use savor_core::types::DbId;

use crate::models::category::Category;
use crate::models::image::{CreateRestaurantImage, RestaurantImage};
use crate::models::restaurant::{
    CreateRestaurant, Restaurant, RestaurantFilter, RestaurantWithRelations, UpdateRestaurant,
};
use crate::repositories::{CategoryRepo, RestaurantImageRepo, RestaurantRepo};
use crate::DbPool;

/// Error returned by [`RestaurantStore`] implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness rule was violated; carries the constraint name.
    #[error("Duplicate value violates unique constraint: {0}")]
    Duplicate(String),

    /// A referenced row does not exist.
    #[error("Foreign key violation: {0} does not exist")]
    ForeignKey(String),

    /// A value is outside the range a check constraint allows; carries the
    /// constraint name.
    #[error("Value violates check constraint: {0}")]
    Check(String),
}

/// Storage operations for restaurants, categories and photos.
#[async_trait]
pub trait RestaurantStore: Send + Sync {
    // -- Categories ---------------------------------------------------------

    /// Insert a category by exact name or return the existing one. The
    /// `is_custom` flag of an existing row is never changed.
    async fn upsert_category(&self, name: &str, is_custom: bool) -> Result<Category, StoreError>;

    async fn find_category(&self, id: DbId) -> Result<Option<Category>, StoreError>;

    /// All categories: defaults first, then by name.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// Delete a category and detach it from every restaurant.
    async fn delete_category(&self, id: DbId) -> Result<bool, StoreError>;

    // -- Restaurants --------------------------------------------------------

    async fn create_restaurant(&self, input: &CreateRestaurant) -> Result<Restaurant, StoreError>;

    /// Update fields and replace the category set. `None` if missing.
    async fn update_restaurant(
        &self,
        id: DbId,
        input: &UpdateRestaurant,
    ) -> Result<Option<Restaurant>, StoreError>;

    async fn set_rating(&self, id: DbId, rating: f64) -> Result<Option<Restaurant>, StoreError>;

    /// Atomically delete a restaurant and its photo rows, returning the
    /// photos removed. `None` if the restaurant did not exist.
    async fn delete_restaurant(&self, id: DbId) -> Result<Option<Vec<RestaurantImage>>, StoreError>;

    async fn find_restaurant(&self, id: DbId) -> Result<Option<RestaurantWithRelations>, StoreError>;

    /// Restaurants matching `filter`, newest first.
    async fn list_restaurants(
        &self,
        filter: &RestaurantFilter,
    ) -> Result<Vec<RestaurantWithRelations>, StoreError>;

    // -- Images -------------------------------------------------------------

    async fn list_images(&self, restaurant_id: DbId) -> Result<Vec<RestaurantImage>, StoreError>;

    async fn find_image(&self, id: DbId) -> Result<Option<RestaurantImage>, StoreError>;

    /// Insert a photo. Fails with [`StoreError::Duplicate`] (or the
    /// equivalent database error) if the slot is taken, and with
    /// [`StoreError::Check`] (or the database error) if it is outside 1..=5.
    async fn create_image(&self, input: &CreateRestaurantImage) -> Result<RestaurantImage, StoreError>;

    /// Delete the listed photos owned by `restaurant_id`; other ids are
    /// ignored. Returns the rows removed.
    async fn delete_images(
        &self,
        restaurant_id: DbId,
        image_ids: &[DbId],
    ) -> Result<Vec<RestaurantImage>, StoreError>;

    /// Whether the backing store is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

/// [`RestaurantStore`] backed by PostgreSQL through the repositories.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Attach categories and photos to a batch of rows with two queries.
    async fn load_relations(
        &self,
        restaurants: Vec<Restaurant>,
    ) -> Result<Vec<RestaurantWithRelations>, sqlx::Error> {
        if restaurants.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<DbId> = restaurants.iter().map(|r| r.id).collect();

        let mut categories: HashMap<DbId, Vec<Category>> = HashMap::new();
        for linked in CategoryRepo::list_for_restaurants(&self.pool, &ids).await? {
            categories
                .entry(linked.restaurant_id)
                .or_default()
                .push(linked.category);
        }

        let mut images: HashMap<DbId, Vec<RestaurantImage>> = HashMap::new();
        for image in RestaurantImageRepo::list_for_restaurants(&self.pool, &ids).await? {
            images.entry(image.restaurant_id).or_default().push(image);
        }

        Ok(restaurants
            .into_iter()
            .map(|r| {
                let id = r.id;
                RestaurantWithRelations::from_parts(
                    r,
                    categories.remove(&id).unwrap_or_default(),
                    images.remove(&id).unwrap_or_default(),
                )
            })
            .collect())
    }
}

#[async_trait]
impl RestaurantStore for PgStore {
    async fn upsert_category(&self, name: &str, is_custom: bool) -> Result<Category, StoreError> {
        Ok(CategoryRepo::upsert(&self.pool, name, is_custom).await?)
    }

    async fn find_category(&self, id: DbId) -> Result<Option<Category>, StoreError> {
        Ok(CategoryRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(CategoryRepo::list_all(&self.pool).await?)
    }

    async fn delete_category(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(CategoryRepo::delete(&self.pool, id).await?)
    }

    async fn create_restaurant(&self, input: &CreateRestaurant) -> Result<Restaurant, StoreError> {
        Ok(RestaurantRepo::create(&self.pool, input).await?)
    }

    async fn update_restaurant(
        &self,
        id: DbId,
        input: &UpdateRestaurant,
    ) -> Result<Option<Restaurant>, StoreError> {
        Ok(RestaurantRepo::update(&self.pool, id, input).await?)
    }

    async fn set_rating(&self, id: DbId, rating: f64) -> Result<Option<Restaurant>, StoreError> {
        Ok(RestaurantRepo::set_rating(&self.pool, id, rating).await?)
    }

    async fn delete_restaurant(&self, id: DbId) -> Result<Option<Vec<RestaurantImage>>, StoreError> {
        Ok(RestaurantRepo::delete_with_images(&self.pool, id).await?)
    }

    async fn find_restaurant(&self, id: DbId) -> Result<Option<RestaurantWithRelations>, StoreError> {
        let Some(restaurant) = RestaurantRepo::find_by_id(&self.pool, id).await? else {
            return Ok(None);
        };
        Ok(self.load_relations(vec![restaurant]).await?.pop())
    }

    async fn list_restaurants(
        &self,
        filter: &RestaurantFilter,
    ) -> Result<Vec<RestaurantWithRelations>, StoreError> {
        let restaurants = RestaurantRepo::list(&self.pool, filter).await?;
        tracing::debug!(count = restaurants.len(), ?filter, "Listed restaurants");
        Ok(self.load_relations(restaurants).await?)
    }

    async fn list_images(&self, restaurant_id: DbId) -> Result<Vec<RestaurantImage>, StoreError> {
        Ok(RestaurantImageRepo::list_by_restaurant(&self.pool, restaurant_id).await?)
    }

    async fn find_image(&self, id: DbId) -> Result<Option<RestaurantImage>, StoreError> {
        Ok(RestaurantImageRepo::find_by_id(&self.pool, id).await?)
    }

    async fn create_image(&self, input: &CreateRestaurantImage) -> Result<RestaurantImage, StoreError> {
        Ok(RestaurantImageRepo::create(&self.pool, input).await?)
    }

    async fn delete_images(
        &self,
        restaurant_id: DbId,
        image_ids: &[DbId],
    ) -> Result<Vec<RestaurantImage>, StoreError> {
        if image_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(RestaurantImageRepo::delete_for_restaurant(&self.pool, restaurant_id, image_ids).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}

//! Create, update, rate and delete restaurants together with their photos.
//!
//! Every mutation validates its input, writes through the
//! [`RestaurantStore`], places photos via the slot allocator and then
//! invalidates the cached views it affected. Cache invalidation happens even
//! when a photo write fails halfway, since the rows written so far are kept.

use savor_core::error::CoreError;
use savor_core::image_slots;
use savor_core::restaurant::{
    normalize_note, validate_name, validate_rating, validate_restaurant_id,
};
use savor_core::storage::{BlobStore, Upload};
use savor_core::types::DbId;
use savor_db::models::image::{CreateRestaurantImage, RestaurantImage};
use savor_db::models::restaurant::{
    CreateRestaurant, RestaurantFilter, RestaurantWithRelations, UpdateRestaurant,
};
use savor_db::RestaurantStore;

use crate::cache::ViewCache;
use crate::error::AppResult;
use crate::services::category_registry::CategoryRegistry;

/// Input for [`RestaurantWorkflow::create`].
#[derive(Debug, Default)]
pub struct NewRestaurant {
    pub name: String,
    pub note: Option<String>,
    pub category_names: Vec<String>,
    /// Photos keyed by the slot they were submitted for.
    pub images: Vec<(i32, Upload)>,
}

/// Input for [`RestaurantWorkflow::update`].
#[derive(Debug, Default)]
pub struct RestaurantEdit {
    pub name: String,
    pub note: Option<String>,
    pub category_names: Vec<String>,
    pub delete_image_ids: Vec<DbId>,
    /// New photos, placed into the lowest free slots in this order.
    pub new_images: Vec<Upload>,
}

pub struct RestaurantWorkflow<'a> {
    store: &'a dyn RestaurantStore,
    blobs: &'a dyn BlobStore,
    views: &'a ViewCache,
}

impl<'a> RestaurantWorkflow<'a> {
    pub fn new(
        store: &'a dyn RestaurantStore,
        blobs: &'a dyn BlobStore,
        views: &'a ViewCache,
    ) -> Self {
        Self {
            store,
            blobs,
            views,
        }
    }

    fn categories(&self) -> CategoryRegistry<'a> {
        CategoryRegistry::new(self.store, self.views)
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Create a restaurant, link its categories and store photos in the
    /// slots they were submitted for.
    pub async fn create(&self, input: NewRestaurant) -> AppResult<RestaurantWithRelations> {
        let name = validate_name(&input.name)?;
        let note = normalize_note(input.note.as_deref())?;
        let category_ids = self.categories().resolve_all(&input.category_names).await?;

        let restaurant = self
            .store
            .create_restaurant(&CreateRestaurant {
                name,
                note,
                category_ids,
            })
            .await?;

        let uploads = image_slots::explicit_slots(
            input
                .images
                .into_iter()
                .filter(|(_, upload)| !upload.is_empty()),
        );
        let stored = self.store_images(restaurant.id, uploads).await;

        self.views.invalidate_list().await;
        stored?;

        tracing::info!(
            restaurant_id = restaurant.id,
            name = %restaurant.name,
            "Restaurant created"
        );
        self.load(restaurant.id).await
    }

    /// Update fields, replace the category set, drop the listed photos and
    /// place new ones into free slots.
    pub async fn update(
        &self,
        id: DbId,
        input: RestaurantEdit,
    ) -> AppResult<RestaurantWithRelations> {
        if id <= 0 || self.store.find_restaurant(id).await?.is_none() {
            return Err(not_found(id).into());
        }

        let name = validate_name(&input.name)?;
        let note = normalize_note(input.note.as_deref())?;
        let category_ids = self.categories().resolve_all(&input.category_names).await?;

        self.store
            .update_restaurant(
                id,
                &UpdateRestaurant {
                    name,
                    note,
                    category_ids,
                },
            )
            .await?
            .ok_or_else(|| not_found(id))?;

        let result = self
            .replace_images(id, &input.delete_image_ids, input.new_images)
            .await;

        self.views.invalidate_detail(id).await;
        result?;

        tracing::info!(restaurant_id = id, "Restaurant updated");
        self.load(id).await
    }

    /// Delete a restaurant and its photos.
    ///
    /// Returns `false` without touching anything when the id is not positive
    /// or no such restaurant exists.
    pub async fn delete(&self, id: DbId) -> AppResult<bool> {
        if id <= 0 {
            return Ok(false);
        }

        let Some(images) = self.store.delete_restaurant(id).await? else {
            tracing::debug!(restaurant_id = id, "Delete of missing restaurant ignored");
            return Ok(false);
        };

        self.views.invalidate_detail(id).await;
        self.discard_files(&images).await;

        tracing::info!(restaurant_id = id, images = images.len(), "Restaurant deleted");
        Ok(true)
    }

    /// Set the star rating. Rating the same value twice is harmless.
    pub async fn rate(&self, id: DbId, rating: f64) -> AppResult<RestaurantWithRelations> {
        let id = validate_restaurant_id(id)?;
        let rating = validate_rating(rating)?;

        self.store
            .set_rating(id, rating)
            .await?
            .ok_or_else(|| not_found(id))?;

        self.views.invalidate_detail(id).await;

        tracing::info!(restaurant_id = id, rating, "Restaurant rated");
        self.load(id).await
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn get(&self, id: DbId) -> AppResult<RestaurantWithRelations> {
        if let Some(cached) = self.views.detail(id).await {
            return Ok(cached);
        }

        let generation = self.views.generation().await;
        let restaurant = self.load(id).await?;
        self.views.put_detail(generation, restaurant.clone()).await;
        Ok(restaurant)
    }

    /// Restaurants matching `filter`, newest first. The unfiltered list is
    /// served from the view cache when warm.
    pub async fn list(
        &self,
        filter: &RestaurantFilter,
    ) -> AppResult<Vec<RestaurantWithRelations>> {
        if !filter.is_empty() {
            return Ok(self.store.list_restaurants(filter).await?);
        }

        if let Some(cached) = self.views.list().await {
            return Ok(cached);
        }

        let generation = self.views.generation().await;
        let restaurants = self.store.list_restaurants(filter).await?;
        self.views.put_list(generation, restaurants.clone()).await;
        Ok(restaurants)
    }

    pub async fn get_image(&self, id: DbId) -> AppResult<RestaurantImage> {
        Ok(self
            .store
            .find_image(id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Image", id })?)
    }

    // -----------------------------------------------------------------------
    // Photo helpers
    // -----------------------------------------------------------------------

    async fn replace_images(
        &self,
        id: DbId,
        delete_image_ids: &[DbId],
        new_images: Vec<Upload>,
    ) -> AppResult<()> {
        if !delete_image_ids.is_empty() {
            let removed = self.store.delete_images(id, delete_image_ids).await?;
            self.discard_files(&removed).await;
        }

        let retained = self.store.list_images(id).await?;
        let allocation = image_slots::allocate(
            retained.iter().map(|image| image.slot),
            new_images.into_iter().filter(|upload| !upload.is_empty()),
        );
        if allocation.dropped > 0 {
            tracing::debug!(
                restaurant_id = id,
                dropped = allocation.dropped,
                "No free slot for some uploads"
            );
        }

        self.store_images(id, allocation.placed).await
    }

    /// Write each upload and record it in its slot. Stops at the first
    /// failure; rows already created stay.
    async fn store_images(
        &self,
        restaurant_id: DbId,
        uploads: Vec<(i32, Upload)>,
    ) -> AppResult<()> {
        for (slot, upload) in uploads {
            let url = self.blobs.store(&upload).await?;
            let image = self
                .store
                .create_image(&CreateRestaurantImage {
                    restaurant_id,
                    url,
                    slot,
                })
                .await?;
            tracing::debug!(restaurant_id, image_id = image.id, slot, "Image stored");
        }
        Ok(())
    }

    /// Best-effort removal of stored files for deleted photo rows.
    async fn discard_files(&self, images: &[RestaurantImage]) {
        for image in images {
            if let Err(e) = self.blobs.delete(&image.url).await {
                tracing::warn!(
                    image_id = image.id,
                    url = %image.url,
                    error = %e,
                    "Failed to delete image file"
                );
            }
        }
    }

    async fn load(&self, id: DbId) -> AppResult<RestaurantWithRelations> {
        Ok(self
            .store
            .find_restaurant(id)
            .await?
            .ok_or_else(|| not_found(id))?)
    }
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "Restaurant",
        id,
    }
}

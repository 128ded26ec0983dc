//! In-process [`RestaurantStore`] for tests and database-less local runs.
//!
//! All state sits behind one async mutex, so every operation is atomic and
//! the unique, range and reference rules of the SQL schema are checked under
//! the lock.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use savor_core::image_slots::is_valid_slot;
use savor_core::types::DbId;
use tokio::sync::Mutex;

use crate::models::category::Category;
use crate::models::image::{CreateRestaurantImage, RestaurantImage};
use crate::models::restaurant::{
    CreateRestaurant, Restaurant, RestaurantFilter, RestaurantWithRelations, UpdateRestaurant,
};
use crate::store::{RestaurantStore, StoreError};

/// Mirrors the `uq_restaurant_images_slot` constraint.
const IMAGE_SLOT_CONSTRAINT: &str = "uq_restaurant_images_slot";

/// Mirrors the `ck_restaurant_images_slot_range` constraint.
const IMAGE_SLOT_RANGE_CONSTRAINT: &str = "ck_restaurant_images_slot_range";

#[derive(Debug, Default)]
struct Tables {
    last_id: DbId,
    categories: BTreeMap<DbId, Category>,
    restaurants: BTreeMap<DbId, Restaurant>,
    /// `(restaurant_id, category_id)` pairs.
    links: BTreeSet<(DbId, DbId)>,
    images: BTreeMap<DbId, RestaurantImage>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.last_id += 1;
        self.last_id
    }

    fn set_links(&mut self, restaurant_id: DbId, category_ids: &[DbId]) -> Result<(), StoreError> {
        if let Some(missing) = category_ids
            .iter()
            .find(|id| !self.categories.contains_key(*id))
        {
            return Err(StoreError::ForeignKey(format!("category {missing}")));
        }

        self.links.retain(|(r, _)| *r != restaurant_id);
        for &category_id in category_ids {
            self.links.insert((restaurant_id, category_id));
        }
        Ok(())
    }

    fn with_relations(&self, restaurant: &Restaurant) -> RestaurantWithRelations {
        let categories = self
            .links
            .iter()
            .filter(|(r, _)| *r == restaurant.id)
            .filter_map(|(_, c)| self.categories.get(c).cloned())
            .collect();
        let images = self
            .images
            .values()
            .filter(|image| image.restaurant_id == restaurant.id)
            .cloned()
            .collect();

        RestaurantWithRelations::from_parts(restaurant.clone(), categories, images)
    }
}

/// A [`RestaurantStore`] that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RestaurantStore for MemoryStore {
    async fn upsert_category(&self, name: &str, is_custom: bool) -> Result<Category, StoreError> {
        let mut tables = self.tables.lock().await;

        if let Some(existing) = tables.categories.values().find(|c| c.name == name) {
            return Ok(existing.clone());
        }

        let category = Category {
            id: tables.next_id(),
            name: name.to_string(),
            is_custom,
            created_at: chrono::Utc::now(),
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn find_category(&self, id: DbId) -> Result<Option<Category>, StoreError> {
        Ok(self.tables.lock().await.categories.get(&id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let tables = self.tables.lock().await;
        let mut categories: Vec<Category> = tables.categories.values().cloned().collect();
        categories.sort_by(|a, b| (a.is_custom, &a.name).cmp(&(b.is_custom, &b.name)));
        Ok(categories)
    }

    async fn delete_category(&self, id: DbId) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.categories.remove(&id).is_none() {
            return Ok(false);
        }
        tables.links.retain(|(_, c)| *c != id);
        Ok(true)
    }

    async fn create_restaurant(&self, input: &CreateRestaurant) -> Result<Restaurant, StoreError> {
        let mut tables = self.tables.lock().await;

        let now = chrono::Utc::now();
        let restaurant = Restaurant {
            id: tables.next_id(),
            name: input.name.clone(),
            note: input.note.clone(),
            rating: None,
            created_at: now,
            updated_at: now,
        };

        tables.set_links(restaurant.id, &input.category_ids)?;
        tables.restaurants.insert(restaurant.id, restaurant.clone());
        Ok(restaurant)
    }

    async fn update_restaurant(
        &self,
        id: DbId,
        input: &UpdateRestaurant,
    ) -> Result<Option<Restaurant>, StoreError> {
        let mut tables = self.tables.lock().await;
        if !tables.restaurants.contains_key(&id) {
            return Ok(None);
        }

        tables.set_links(id, &input.category_ids)?;

        let Some(restaurant) = tables.restaurants.get_mut(&id) else {
            return Ok(None);
        };
        restaurant.name = input.name.clone();
        restaurant.note = input.note.clone();
        restaurant.updated_at = chrono::Utc::now();
        Ok(Some(restaurant.clone()))
    }

    async fn set_rating(&self, id: DbId, rating: f64) -> Result<Option<Restaurant>, StoreError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.restaurants.get_mut(&id).map(|restaurant| {
            restaurant.rating = Some(rating);
            restaurant.updated_at = chrono::Utc::now();
            restaurant.clone()
        }))
    }

    async fn delete_restaurant(&self, id: DbId) -> Result<Option<Vec<RestaurantImage>>, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.restaurants.remove(&id).is_none() {
            return Ok(None);
        }

        let (removed, kept): (BTreeMap<_, _>, BTreeMap<_, _>) = std::mem::take(&mut tables.images)
            .into_iter()
            .partition(|(_, image)| image.restaurant_id == id);
        tables.images = kept;
        tables.links.retain(|(r, _)| *r != id);

        Ok(Some(removed.into_values().collect()))
    }

    async fn find_restaurant(&self, id: DbId) -> Result<Option<RestaurantWithRelations>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .restaurants
            .get(&id)
            .map(|restaurant| tables.with_relations(restaurant)))
    }

    async fn list_restaurants(
        &self,
        filter: &RestaurantFilter,
    ) -> Result<Vec<RestaurantWithRelations>, StoreError> {
        let tables = self.tables.lock().await;
        let mut restaurants: Vec<RestaurantWithRelations> = tables
            .restaurants
            .values()
            .map(|restaurant| tables.with_relations(restaurant))
            .filter(|restaurant| filter.matches(restaurant))
            .collect();
        restaurants.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(restaurants)
    }

    async fn list_images(&self, restaurant_id: DbId) -> Result<Vec<RestaurantImage>, StoreError> {
        let tables = self.tables.lock().await;
        let mut images: Vec<RestaurantImage> = tables
            .images
            .values()
            .filter(|image| image.restaurant_id == restaurant_id)
            .cloned()
            .collect();
        images.sort_by_key(|image| image.slot);
        Ok(images)
    }

    async fn find_image(&self, id: DbId) -> Result<Option<RestaurantImage>, StoreError> {
        Ok(self.tables.lock().await.images.get(&id).cloned())
    }

    async fn create_image(&self, input: &CreateRestaurantImage) -> Result<RestaurantImage, StoreError> {
        if !is_valid_slot(input.slot) {
            return Err(StoreError::Check(IMAGE_SLOT_RANGE_CONSTRAINT.to_string()));
        }

        let mut tables = self.tables.lock().await;

        if !tables.restaurants.contains_key(&input.restaurant_id) {
            return Err(StoreError::ForeignKey(format!(
                "restaurant {}",
                input.restaurant_id
            )));
        }
        let slot_taken = tables
            .images
            .values()
            .any(|image| image.restaurant_id == input.restaurant_id && image.slot == input.slot);
        if slot_taken {
            return Err(StoreError::Duplicate(IMAGE_SLOT_CONSTRAINT.to_string()));
        }

        let image = RestaurantImage {
            id: tables.next_id(),
            restaurant_id: input.restaurant_id,
            url: input.url.clone(),
            slot: input.slot,
            created_at: chrono::Utc::now(),
        };
        tables.images.insert(image.id, image.clone());
        Ok(image)
    }

    async fn delete_images(
        &self,
        restaurant_id: DbId,
        image_ids: &[DbId],
    ) -> Result<Vec<RestaurantImage>, StoreError> {
        let mut tables = self.tables.lock().await;
        let mut removed = Vec::new();
        for id in image_ids {
            let owned = tables
                .images
                .get(id)
                .is_some_and(|image| image.restaurant_id == restaurant_id);
            if owned {
                removed.extend(tables.images.remove(id));
            }
        }
        Ok(removed)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str, category_ids: Vec<DbId>) -> CreateRestaurant {
        CreateRestaurant {
            name: name.to_string(),
            note: None,
            category_ids,
        }
    }

    #[tokio::test]
    async fn upsert_keeps_existing_flag() {
        let store = MemoryStore::new();
        let first = store.upsert_category("Cafe", false).await.unwrap();
        let second = store.upsert_category("Cafe", true).await.unwrap();

        assert_eq!(first, second);
        assert!(!second.is_custom);
        assert_eq!(store.list_categories().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_slot_rejected() {
        let store = MemoryStore::new();
        let restaurant = store.create_restaurant(&create("Aurora", vec![])).await.unwrap();
        let input = CreateRestaurantImage {
            restaurant_id: restaurant.id,
            url: "/uploads/a.jpg".into(),
            slot: 1,
        };

        store.create_image(&input).await.unwrap();
        let err = store.create_image(&input).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(ref c) if c == IMAGE_SLOT_CONSTRAINT));
    }

    #[tokio::test]
    async fn out_of_range_slot_rejected() {
        let store = MemoryStore::new();
        let restaurant = store.create_restaurant(&create("Aurora", vec![])).await.unwrap();

        for slot in [0, 6] {
            let err = store
                .create_image(&CreateRestaurantImage {
                    restaurant_id: restaurant.id,
                    url: "/uploads/a.jpg".into(),
                    slot,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, StoreError::Check(ref c) if c == IMAGE_SLOT_RANGE_CONSTRAINT));
        }
        assert!(store.list_images(restaurant.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_images_ignores_foreign_ids() {
        let store = MemoryStore::new();
        let mine = store.create_restaurant(&create("Mine", vec![])).await.unwrap();
        let other = store.create_restaurant(&create("Other", vec![])).await.unwrap();
        let foreign = store
            .create_image(&CreateRestaurantImage {
                restaurant_id: other.id,
                url: "/uploads/o.jpg".into(),
                slot: 1,
            })
            .await
            .unwrap();

        let removed = store.delete_images(mine.id, &[foreign.id]).await.unwrap();
        assert!(removed.is_empty());
        assert!(store.find_image(foreign.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unknown_category_link_rejected() {
        let store = MemoryStore::new();
        let err = store.create_restaurant(&create("Ghost", vec![99])).await.unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey(_)));
        assert!(store
            .list_restaurants(&RestaurantFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryStore::new();
        let older = store.create_restaurant(&create("Older", vec![])).await.unwrap();
        let newer = store.create_restaurant(&create("Newer", vec![])).await.unwrap();

        let listed = store.list_restaurants(&RestaurantFilter::default()).await.unwrap();
        let ids: Vec<DbId> = listed.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }
}

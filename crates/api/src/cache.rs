//! In-process cache of rendered restaurant views.
//!
//! Only the unfiltered list and per-restaurant detail views are cached.
//! Every mutation bumps a generation counter; a reader that loaded data
//! under an older generation is not allowed to store it.

use std::collections::HashMap;

use savor_core::types::DbId;
use savor_db::models::restaurant::RestaurantWithRelations;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Views {
    generation: u64,
    list: Option<Vec<RestaurantWithRelations>>,
    details: HashMap<DbId, RestaurantWithRelations>,
}

/// Cache of list and detail views, invalidated by the mutation workflow.
#[derive(Debug, Default)]
pub struct ViewCache {
    views: RwLock<Views>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation; pass it back to `put_*` after loading.
    pub async fn generation(&self) -> u64 {
        self.views.read().await.generation
    }

    pub async fn list(&self) -> Option<Vec<RestaurantWithRelations>> {
        self.views.read().await.list.clone()
    }

    /// Store the unfiltered list if nothing was invalidated since `generation`.
    pub async fn put_list(&self, generation: u64, list: Vec<RestaurantWithRelations>) {
        let mut views = self.views.write().await;
        if views.generation == generation {
            views.list = Some(list);
        }
    }

    pub async fn detail(&self, id: DbId) -> Option<RestaurantWithRelations> {
        self.views.read().await.details.get(&id).cloned()
    }

    pub async fn put_detail(&self, generation: u64, restaurant: RestaurantWithRelations) {
        let mut views = self.views.write().await;
        if views.generation == generation {
            views.details.insert(restaurant.id, restaurant);
        }
    }

    /// Drop the list view (a restaurant was added).
    pub async fn invalidate_list(&self) {
        let mut views = self.views.write().await;
        views.generation += 1;
        views.list = None;
    }

    /// Drop the list view and one detail view.
    pub async fn invalidate_detail(&self, id: DbId) {
        let mut views = self.views.write().await;
        views.generation += 1;
        views.list = None;
        views.details.remove(&id);
    }

    /// Drop everything (a category change can touch every restaurant).
    pub async fn invalidate_all(&self) {
        let mut views = self.views.write().await;
        views.generation += 1;
        views.list = None;
        views.details.clear();
    }
}

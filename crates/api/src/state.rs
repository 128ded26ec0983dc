use std::sync::Arc;

use savor_core::storage::BlobStore;
use savor_db::RestaurantStore;

use crate::cache::ViewCache;
use crate::config::ServerConfig;
use crate::error::AppResult;
use crate::services::{CategoryRegistry, RestaurantWorkflow};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Restaurant, category and image persistence.
    pub store: Arc<dyn RestaurantStore>,
    /// Storage for uploaded photo files.
    pub blobs: Arc<dyn BlobStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Cached list and detail views.
    pub views: Arc<ViewCache>,
}

impl AppState {
    /// Build the state and make sure the default categories exist.
    pub async fn initialize(
        store: Arc<dyn RestaurantStore>,
        blobs: Arc<dyn BlobStore>,
        config: ServerConfig,
    ) -> AppResult<Self> {
        let state = Self {
            store,
            blobs,
            config: Arc::new(config),
            views: Arc::new(ViewCache::new()),
        };
        state.categories().ensure_defaults().await?;
        Ok(state)
    }

    pub fn categories(&self) -> CategoryRegistry<'_> {
        CategoryRegistry::new(self.store.as_ref(), &self.views)
    }

    pub fn restaurants(&self) -> RestaurantWorkflow<'_> {
        RestaurantWorkflow::new(self.store.as_ref(), self.blobs.as_ref(), &self.views)
    }
}

//! Category lookup, creation and deletion.

use std::collections::HashSet;

use savor_core::category::{
    ensure_deletable, is_custom_name, normalize_category_names, require_category_name,
    validate_category_name, DEFAULT_CATEGORY_NAMES,
};
use savor_core::error::CoreError;
use savor_core::types::DbId;
use savor_db::models::category::Category;
use savor_db::RestaurantStore;

use crate::cache::ViewCache;
use crate::error::AppResult;

/// Resolves category names to ids and guards the default set.
pub struct CategoryRegistry<'a> {
    store: &'a dyn RestaurantStore,
    views: &'a ViewCache,
}

impl<'a> CategoryRegistry<'a> {
    pub fn new(store: &'a dyn RestaurantStore, views: &'a ViewCache) -> Self {
        Self { store, views }
    }

    /// Make sure every default category exists. Safe to call repeatedly.
    pub async fn ensure_defaults(&self) -> AppResult<Vec<Category>> {
        let mut defaults = Vec::with_capacity(DEFAULT_CATEGORY_NAMES.len());
        for name in DEFAULT_CATEGORY_NAMES {
            defaults.push(self.store.upsert_category(name, false).await?);
        }
        tracing::debug!(count = defaults.len(), "Default categories ensured");
        Ok(defaults)
    }

    /// Find or create the category named `name`.
    ///
    /// Lookup is by exact (trimmed) name. A newly created category is custom
    /// unless its name is one of the defaults. Only [`Self::create`] caps the
    /// name length.
    pub async fn resolve(&self, name: &str) -> AppResult<DbId> {
        let name = require_category_name(name)?;
        let category = self
            .store
            .upsert_category(&name, is_custom_name(&name))
            .await?;
        Ok(category.id)
    }

    /// Resolve a submitted list of names into a duplicate-free id list.
    pub async fn resolve_all<I, S>(&self, names: I) -> AppResult<Vec<DbId>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for name in normalize_category_names(names) {
            let id = self.resolve(&name).await?;
            if seen.insert(id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    /// Explicitly add a category, returning the existing one if present.
    pub async fn create(&self, name: &str) -> AppResult<Category> {
        let name = validate_category_name(name)?;
        let category = self
            .store
            .upsert_category(&name, is_custom_name(&name))
            .await?;
        tracing::info!(category_id = category.id, name = %category.name, "Category resolved");
        Ok(category)
    }

    pub async fn list(&self) -> AppResult<Vec<Category>> {
        Ok(self.store.list_categories().await?)
    }

    /// Delete a custom category and detach it from every restaurant.
    pub async fn delete(&self, id: DbId) -> AppResult<()> {
        let category = self
            .store
            .find_category(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Category",
                id,
            })?;

        ensure_deletable(&category.name, category.is_custom)?;

        if !self.store.delete_category(id).await? {
            return Err(CoreError::NotFound {
                entity: "Category",
                id,
            }
            .into());
        }

        self.views.invalidate_all().await;
        tracing::info!(category_id = id, name = %category.name, "Category deleted");
        Ok(())
    }
}

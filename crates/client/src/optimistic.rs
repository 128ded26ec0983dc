//! Optimistic projection of restaurant mutations.
//!
//! The [`Reconciler`] keeps the last confirmed server snapshot plus a queue
//! of [`OptimisticAction`]s. [`Reconciler::view`] folds the queue over the
//! snapshot with [`reduce`]; [`Reconciler::reconcile`] replaces the snapshot
//! with the server's answer and drops the queue.

use savor_core::category::{is_custom_name, normalize_category_names};
use savor_core::types::{DbId, Timestamp};
use savor_db::models::category::Category;
use savor_db::models::image::RestaurantImage;
use savor_db::models::restaurant::RestaurantWithRelations;
use serde::{Deserialize, Serialize};

/// Client-local identifier for an entity the server has not assigned yet.
pub type LocalToken = u64;

/// Identity of a restaurant or category in the projected state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKey {
    Persisted(DbId),
    Pending(LocalToken),
}

impl EntityKey {
    /// The server id, if the entity has one.
    pub fn persisted_id(self) -> Option<DbId> {
        match self {
            EntityKey::Persisted(id) => Some(id),
            EntityKey::Pending(_) => None,
        }
    }

    pub fn is_pending(self) -> bool {
        matches!(self, EntityKey::Pending(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimisticCategory {
    pub key: EntityKey,
    pub name: String,
    pub is_custom: bool,
}

impl From<Category> for OptimisticCategory {
    fn from(category: Category) -> Self {
        Self {
            key: EntityKey::Persisted(category.id),
            name: category.name,
            is_custom: category.is_custom,
        }
    }
}

/// A restaurant as the dashboard renders it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimisticRestaurant {
    pub key: EntityKey,
    pub name: String,
    pub note: Option<String>,
    pub rating: Option<f64>,
    pub created_at: Timestamp,
    pub categories: Vec<OptimisticCategory>,
    pub images: Vec<RestaurantImage>,
}

impl From<RestaurantWithRelations> for OptimisticRestaurant {
    fn from(restaurant: RestaurantWithRelations) -> Self {
        Self {
            key: EntityKey::Persisted(restaurant.id),
            name: restaurant.name,
            note: restaurant.note,
            rating: restaurant.rating,
            created_at: restaurant.created_at,
            categories: restaurant.categories.into_iter().map(Into::into).collect(),
            images: restaurant.images,
        }
    }
}

/// The editable fields of a restaurant form.
#[derive(Debug, Clone, Default)]
pub struct RestaurantDraft {
    pub name: String,
    pub note: Option<String>,
    pub category_names: Vec<String>,
}

/// A mutation awaiting the server's answer.
#[derive(Debug, Clone, PartialEq)]
pub enum OptimisticAction {
    /// Prepend a provisional restaurant.
    Add(OptimisticRestaurant),
    /// Replace the entry with the same key.
    Update(OptimisticRestaurant),
    /// Remove the entry with this key.
    Delete(EntityKey),
}

/// Apply one action to a projected list.
pub fn reduce(
    state: &[OptimisticRestaurant],
    action: &OptimisticAction,
) -> Vec<OptimisticRestaurant> {
    match action {
        OptimisticAction::Add(restaurant) => std::iter::once(restaurant.clone())
            .chain(state.iter().cloned())
            .collect(),
        OptimisticAction::Update(restaurant) => state
            .iter()
            .map(|existing| {
                if existing.key == restaurant.key {
                    restaurant.clone()
                } else {
                    existing.clone()
                }
            })
            .collect(),
        OptimisticAction::Delete(key) => state
            .iter()
            .filter(|existing| existing.key != *key)
            .cloned()
            .collect(),
    }
}

/// Confirmed server state plus the mutations still in flight.
#[derive(Debug, Default)]
pub struct Reconciler {
    confirmed: Vec<OptimisticRestaurant>,
    categories: Vec<Category>,
    pending: Vec<OptimisticAction>,
    next_token: LocalToken,
}

impl Reconciler {
    pub fn new(restaurants: Vec<RestaurantWithRelations>, categories: Vec<Category>) -> Self {
        Self {
            confirmed: restaurants.into_iter().map(Into::into).collect(),
            categories,
            ..Default::default()
        }
    }

    /// Queue a provisional restaurant and return its pending key.
    pub fn add(&mut self, draft: RestaurantDraft, now: Timestamp) -> EntityKey {
        let key = self.issue_token();
        let categories = self.project_categories(&draft.category_names);

        self.pending.push(OptimisticAction::Add(OptimisticRestaurant {
            key,
            name: draft.name.trim().to_string(),
            note: trimmed_note(draft.note),
            rating: None,
            created_at: now,
            categories,
            images: Vec::new(),
        }));
        key
    }

    /// Queue an edit of the entry with `key`.
    ///
    /// Creation time, photos and rating carry over from the current
    /// projection. Returns `false` if no such entry is visible.
    pub fn update(&mut self, key: EntityKey, draft: RestaurantDraft) -> bool {
        let Some(current) = self.view().into_iter().find(|r| r.key == key) else {
            return false;
        };
        let categories = self.project_categories(&draft.category_names);

        self.pending.push(OptimisticAction::Update(OptimisticRestaurant {
            key,
            name: draft.name.trim().to_string(),
            note: trimmed_note(draft.note),
            categories,
            ..current
        }));
        true
    }

    pub fn delete(&mut self, key: EntityKey) {
        self.pending.push(OptimisticAction::Delete(key));
    }

    /// The confirmed snapshot with every pending action applied in order.
    pub fn view(&self) -> Vec<OptimisticRestaurant> {
        self.pending
            .iter()
            .fold(self.confirmed.clone(), |state, action| reduce(&state, action))
    }

    /// Replace local state with the server's answer, discarding all pending
    /// actions.
    pub fn reconcile(
        &mut self,
        restaurants: Vec<RestaurantWithRelations>,
        categories: Vec<Category>,
    ) {
        tracing::debug!(
            discarded = self.pending.len(),
            restaurants = restaurants.len(),
            "Reconciled with server state"
        );
        self.confirmed = restaurants.into_iter().map(Into::into).collect();
        self.categories = categories;
        self.pending.clear();
    }

    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    fn issue_token(&mut self) -> EntityKey {
        self.next_token += 1;
        EntityKey::Pending(self.next_token)
    }

    /// Match names against known categories ignoring case; unknown names get
    /// a pending placeholder.
    fn project_categories(&mut self, names: &[String]) -> Vec<OptimisticCategory> {
        let mut projected: Vec<OptimisticCategory> = normalize_category_names(names)
            .into_iter()
            .map(|name| {
                let known = self
                    .categories
                    .iter()
                    .find(|c| c.name.to_lowercase() == name.to_lowercase())
                    .cloned();
                match known {
                    Some(category) => category.into(),
                    None => OptimisticCategory {
                        key: self.issue_token(),
                        is_custom: is_custom_name(&name),
                        name,
                    },
                }
            })
            .collect();
        projected.sort_by(|a, b| a.name.cmp(&b.name));
        projected
    }
}

fn trimmed_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use savor_db::models::restaurant::Restaurant;

    use super::*;

    fn at(secs: i64) -> Timestamp {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn category(id: DbId, name: &str, is_custom: bool) -> Category {
        Category {
            id,
            name: name.into(),
            is_custom,
            created_at: at(0),
        }
    }

    fn server_restaurant(id: DbId, name: &str) -> RestaurantWithRelations {
        RestaurantWithRelations::from_parts(
            Restaurant {
                id,
                name: name.into(),
                note: None,
                rating: Some(4.0),
                created_at: at(id * 10),
                updated_at: at(id * 10),
            },
            vec![category(1, "Cafe", false)],
            vec![RestaurantImage {
                id: 100 + id,
                restaurant_id: id,
                url: format!("/uploads/{id}.jpg"),
                slot: 1,
                created_at: at(id * 10),
            }],
        )
    }

    fn draft(name: &str, categories: &[&str]) -> RestaurantDraft {
        RestaurantDraft {
            name: name.into(),
            note: None,
            category_names: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn reconciler() -> Reconciler {
        Reconciler::new(
            vec![server_restaurant(2, "Second"), server_restaurant(1, "First")],
            vec![category(1, "Cafe", false), category(2, "Pub", false)],
        )
    }

    #[test]
    fn add_prepends_provisional_entry() {
        let mut r = reconciler();
        let key = r.add(draft(" Aurora ", &["cafe", "Brunch"]), at(99));

        let view = r.view();
        assert_eq!(view.len(), 3);
        let added = &view[0];
        assert_eq!(added.key, key);
        assert!(key.is_pending());
        assert_eq!(added.name, "Aurora");
        assert_eq!(added.created_at, at(99));
        assert_eq!(added.rating, None);
        assert!(added.images.is_empty());

        assert_eq!(added.categories[0].name, "Brunch");
        assert!(added.categories[0].key.is_pending());
        assert!(added.categories[0].is_custom);
        assert_eq!(added.categories[1].name, "Cafe");
        assert_eq!(added.categories[1].key, EntityKey::Persisted(1));
    }

    #[test]
    fn update_preserves_unedited_fields() {
        let mut r = reconciler();
        let key = EntityKey::Persisted(1);

        assert!(r.update(
            key,
            RestaurantDraft {
                note: Some("  new note ".into()),
                ..draft("First Renamed", &["Pub"])
            }
        ));

        let updated = r.view().into_iter().find(|x| x.key == key).unwrap();
        assert_eq!(updated.name, "First Renamed");
        assert_eq!(updated.note.as_deref(), Some("new note"));
        assert_eq!(updated.rating, Some(4.0));
        assert_eq!(updated.created_at, at(10));
        assert_eq!(updated.images.len(), 1);
        assert_eq!(updated.categories.len(), 1);
        assert_eq!(updated.categories[0].key, EntityKey::Persisted(2));
    }

    #[test]
    fn update_of_unknown_key_is_ignored() {
        let mut r = reconciler();
        assert!(!r.update(EntityKey::Persisted(77), draft("Ghost", &[])));
        assert!(!r.is_pending());
    }

    #[test]
    fn update_can_target_a_pending_add() {
        let mut r = reconciler();
        let key = r.add(draft("Aurora", &[]), at(99));
        assert!(r.update(key, draft("Aurora Bistro", &[])));

        let view = r.view();
        assert_eq!(view[0].name, "Aurora Bistro");
        assert_eq!(view[0].created_at, at(99));
    }

    #[test]
    fn delete_removes_entry() {
        let mut r = reconciler();
        r.delete(EntityKey::Persisted(2));

        let keys: Vec<EntityKey> = r.view().iter().map(|x| x.key).collect();
        assert_eq!(keys, vec![EntityKey::Persisted(1)]);
    }

    #[test]
    fn reconcile_discards_pending_actions() {
        let mut r = reconciler();
        r.add(draft("Aurora", &[]), at(99));
        r.delete(EntityKey::Persisted(1));
        assert!(r.is_pending());

        r.reconcile(
            vec![server_restaurant(3, "Aurora"), server_restaurant(2, "Second")],
            vec![category(1, "Cafe", false)],
        );

        assert!(!r.is_pending());
        let keys: Vec<EntityKey> = r.view().iter().map(|x| x.key).collect();
        assert_eq!(keys, vec![EntityKey::Persisted(3), EntityKey::Persisted(2)]);
        assert_eq!(r.categories().len(), 1);
    }

    #[test]
    fn reduce_is_pure() {
        let state: Vec<OptimisticRestaurant> = vec![server_restaurant(1, "First").into()];
        let action = OptimisticAction::Delete(EntityKey::Persisted(1));

        let next = reduce(&state, &action);
        assert!(next.is_empty());
        assert_eq!(state.len(), 1);
    }
}

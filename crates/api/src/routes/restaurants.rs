//! Route definitions for restaurants.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::restaurants;
use crate::state::AppState;

/// Restaurant routes mounted at `/restaurants`.
///
/// ```text
/// GET    /                  -> list_restaurants
/// POST   /                  -> create_restaurant
/// GET    /{id}              -> get_restaurant
/// PUT    /{id}              -> update_restaurant
/// DELETE /{id}              -> delete_restaurant
/// PUT    /{id}/rating       -> rate_restaurant
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(restaurants::list_restaurants).post(restaurants::create_restaurant),
        )
        .route(
            "/{id}",
            get(restaurants::get_restaurant)
                .put(restaurants::update_restaurant)
                .delete(restaurants::delete_restaurant),
        )
        .route("/{id}/rating", put(restaurants::rate_restaurant))
}

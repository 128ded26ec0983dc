pub mod categories;
pub mod health;
pub mod images;
pub mod restaurants;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /restaurants                      list, create (multipart)
/// /restaurants/{id}                 get, update (multipart), delete
/// /restaurants/{id}/rating          rate (PUT)
///
/// /images/{id}                      get
///
/// /categories                       list, create
/// /categories/{id}                  delete (custom only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/restaurants", restaurants::router())
        .nest("/images", images::router())
        .nest("/categories", categories::router())
}

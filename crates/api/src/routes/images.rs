use axum::routing::get;
use axum::Router;

use crate::handlers::images;
use crate::state::AppState;

/// Image routes mounted at `/images`.
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(images::get_image))
}

//! Handlers for restaurant CRUD and rating.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use savor_core::types::DbId;
use serde::Deserialize;

use crate::error::AppResult;
use crate::forms::RestaurantForm;
use crate::query::RestaurantListQuery;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /restaurants/{id}/rating`.
#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub rating: f64,
}

/// GET /api/v1/restaurants
///
/// List restaurants newest first, optionally filtered by name, category ids
/// and minimum rating.
pub async fn list_restaurants(
    State(state): State<AppState>,
    Query(params): Query<RestaurantListQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = params.into_filter()?;
    let restaurants = state.restaurants().list(&filter).await?;

    Ok(Json(DataResponse { data: restaurants }))
}

/// POST /api/v1/restaurants
///
/// Create a restaurant from a multipart form.
pub async fn create_restaurant(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = RestaurantForm::from_multipart(multipart).await?;
    let restaurant = state
        .restaurants()
        .create(form.into_new_restaurant())
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: restaurant })))
}

/// GET /api/v1/restaurants/{id}
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let restaurant = state.restaurants().get(id).await?;

    Ok(Json(DataResponse { data: restaurant }))
}

/// PUT /api/v1/restaurants/{id}
///
/// Update a restaurant from a multipart form. The category set is replaced.
pub async fn update_restaurant(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = RestaurantForm::from_multipart(multipart).await?;
    let restaurant = state.restaurants().update(id, form.into_edit()).await?;

    Ok(Json(DataResponse { data: restaurant }))
}

/// DELETE /api/v1/restaurants/{id}
///
/// Always 204; deleting a missing restaurant is not an error.
pub async fn delete_restaurant(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.restaurants().delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/restaurants/{id}/rating
pub async fn rate_restaurant(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RateRequest>,
) -> AppResult<impl IntoResponse> {
    let restaurant = state.restaurants().rate(id, input.rating).await?;

    Ok(Json(DataResponse { data: restaurant }))
}

//! Handlers for the category manager.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use savor_core::types::DbId;
use savor_db::models::category::CreateCategory;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories
///
/// Default categories first, then custom ones, each by name.
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = state.categories().list().await?;

    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/categories
///
/// Add a category. An existing category with the same name is returned
/// unchanged.
pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    let category = state.categories().create(&input.name).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// DELETE /api/v1/categories/{id}
///
/// Only custom categories can be deleted.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.categories().delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

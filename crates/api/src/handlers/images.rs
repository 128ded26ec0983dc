use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use savor_core::types::DbId;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/images/{id}
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let image = state.restaurants().get_image(id).await?;

    Ok(Json(DataResponse { data: image }))
}

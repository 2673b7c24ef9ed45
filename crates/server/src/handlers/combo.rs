use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use model::{Combo, ComboDetails, CreateComboRequest, Page, UpdateComboRequest};
use uuid::Uuid;

use crate::error::{ApiError, AppJson, AppPath, AppQuery};
use crate::params::ListParams;
use crate::AppState;

pub async fn create(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateComboRequest>,
) -> Result<(StatusCode, Json<ComboDetails>), ApiError> {
    let details = state.combos.create_combo(&req).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

pub async fn get(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ComboDetails>, ApiError> {
    Ok(Json(state.combos.get_combo(id).await?))
}

pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<Page<Combo>>, ApiError> {
    let req = params.list(state.lists)?;
    Ok(Json(state.combos.list_combos(&req).await?))
}

pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<UpdateComboRequest>,
) -> Result<Json<ComboDetails>, ApiError> {
    Ok(Json(state.combos.update_combo(id, &req).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.combos.delete_combo(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

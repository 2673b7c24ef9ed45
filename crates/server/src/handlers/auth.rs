use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use model::{LoginConfirmRequest, LoginResponse, RegisterConfirmRequest, SendCodeRequest};
use serde_json::{json, Value};
use tracing::info;

use crate::error::{ApiError, AppJson};
use crate::AppState;

pub async fn send_code(
    State(state): State<AppState>,
    AppJson(req): AppJson<SendCodeRequest>,
) -> Result<Json<Value>, ApiError> {
    state.auth.send_code(&req).await?;
    Ok(Json(json!({ "message": "verification code sent" })))
}

pub async fn confirm_login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginConfirmRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let resp = state.auth.confirm_login(&req).await?;
    Ok(Json(resp))
}

pub async fn confirm_admin_login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginConfirmRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let resp = state.auth.confirm_admin_login(&req).await?;
    Ok(Json(resp))
}

pub async fn confirm_register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterConfirmRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiError> {
    let resp = state.auth.confirm_register(&req).await?;
    info!(user_id = %resp.id, "registration confirmed");
    Ok((StatusCode::CREATED, Json(resp)))
}

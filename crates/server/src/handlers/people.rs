use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use model::{Admin, AdminRequest, Page, User, UserRequest};
use service::validation;
use uuid::Uuid;

use crate::error::{ApiError, AppJson, AppPath, AppQuery};
use crate::params::ListParams;
use crate::AppState;

pub async fn create_user(
    State(state): State<AppState>,
    AppJson(req): AppJson<UserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    validation::user(&req)?;
    let user = state.repos.users.create(&req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.repos.users.get_by_id(id).await?))
}

pub async fn list_users(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<Page<User>>, ApiError> {
    let req = params.list(state.lists)?;
    Ok(Json(state.repos.users.list(&req).await?))
}

pub async fn update_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<UserRequest>,
) -> Result<Json<User>, ApiError> {
    validation::user(&req)?;
    Ok(Json(state.repos.users.update(id, &req).await?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.repos.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_admin(
    State(state): State<AppState>,
    AppJson(req): AppJson<AdminRequest>,
) -> Result<(StatusCode, Json<Admin>), ApiError> {
    validation::admin(&req)?;
    let admin = state.repos.admins.create(&req).await?;
    Ok((StatusCode::CREATED, Json(admin)))
}

pub async fn get_admin(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Admin>, ApiError> {
    Ok(Json(state.repos.admins.get_by_id(id).await?))
}

pub async fn list_admins(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<Page<Admin>>, ApiError> {
    let req = params.list(state.lists)?;
    Ok(Json(state.repos.admins.list(&req).await?))
}

pub async fn update_admin(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<AdminRequest>,
) -> Result<Json<Admin>, ApiError> {
    validation::admin(&req)?;
    Ok(Json(state.repos.admins.update(id, &req).await?))
}

pub async fn delete_admin(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.repos.admins.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

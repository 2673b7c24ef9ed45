use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use model::{Banner, BannerRequest, Branch, BranchRequest, Page};
use service::validation;
use uuid::Uuid;

use crate::error::{ApiError, AppJson, AppPath, AppQuery};
use crate::params::ListParams;
use crate::AppState;

pub async fn create_branch(
    State(state): State<AppState>,
    AppJson(req): AppJson<BranchRequest>,
) -> Result<(StatusCode, Json<Branch>), ApiError> {
    validation::branch(&req)?;
    let branch = state.repos.branches.create(&req).await?;
    Ok((StatusCode::CREATED, Json(branch)))
}

pub async fn get_branch(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Branch>, ApiError> {
    Ok(Json(state.repos.branches.get_by_id(id).await?))
}

pub async fn list_branches(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<Page<Branch>>, ApiError> {
    let req = params.list(state.lists)?;
    Ok(Json(state.repos.branches.list(&req).await?))
}

pub async fn update_branch(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<BranchRequest>,
) -> Result<Json<Branch>, ApiError> {
    validation::branch(&req)?;
    Ok(Json(state.repos.branches.update(id, &req).await?))
}

pub async fn delete_branch(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.repos.branches.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_banner(
    State(state): State<AppState>,
    AppJson(req): AppJson<BannerRequest>,
) -> Result<(StatusCode, Json<Banner>), ApiError> {
    validation::banner(&req)?;
    let banner = state.repos.banners.create(&req).await?;
    Ok((StatusCode::CREATED, Json(banner)))
}

pub async fn list_banners(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<Page<Banner>>, ApiError> {
    let req = params.list(state.lists)?;
    Ok(Json(state.repos.banners.list(&req).await?))
}

pub async fn delete_banner(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.repos.banners.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

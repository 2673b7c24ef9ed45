use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use model::{Category, CategoryRequest, Page, Product, ProductRequest};
use service::validation;
use uuid::Uuid;

use crate::error::{ApiError, AppJson, AppPath, AppQuery};
use crate::params::ListParams;
use crate::AppState;

pub async fn create_category(
    State(state): State<AppState>,
    AppJson(req): AppJson<CategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    validation::category(&req)?;
    let category = state.repos.categories.create(&req).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn get_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(state.repos.categories.get_by_id(id).await?))
}

pub async fn list_categories(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<Page<Category>>, ApiError> {
    let req = params.list(state.lists)?;
    Ok(Json(state.repos.categories.list(&req).await?))
}

pub async fn update_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<CategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    validation::category(&req)?;
    Ok(Json(state.repos.categories.update(id, &req).await?))
}

pub async fn delete_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.repos.categories.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_product(
    State(state): State<AppState>,
    AppJson(req): AppJson<ProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    validation::product(&req)?;
    let product = state.repos.products.create(&req).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.repos.products.get_by_id(id).await?))
}

/// Accepts `category_id` in addition to the common listing parameters.
pub async fn list_products(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<Page<Product>>, ApiError> {
    let req = params.products(state.lists)?;
    Ok(Json(state.repos.products.list(&req).await?))
}

pub async fn update_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<ProductRequest>,
) -> Result<Json<Product>, ApiError> {
    validation::product(&req)?;
    Ok(Json(state.repos.products.update(id, &req).await?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.repos.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

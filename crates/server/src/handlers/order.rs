use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use model::{ChangeStatusRequest, CreateOrderRequest, Order, OrderDetails, Page, UpdateOrderRequest};
use uuid::Uuid;

use crate::error::{ApiError, AppJson, AppPath, AppQuery};
use crate::params::ListParams;
use crate::AppState;

pub async fn create(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderDetails>), ApiError> {
    let details = state.orders.create_order(&req).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

pub async fn get(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<OrderDetails>, ApiError> {
    Ok(Json(state.orders.get_order(id).await?))
}

pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<Page<Order>>, ApiError> {
    let req = params.orders(state.lists)?;
    Ok(Json(state.orders.list_orders(&req).await?))
}

pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<UpdateOrderRequest>,
) -> Result<Json<OrderDetails>, ApiError> {
    Ok(Json(state.orders.update_order(id, &req).await?))
}

pub async fn change_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<ChangeStatusRequest>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.orders.change_status(id, &req.status).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.orders.delete_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

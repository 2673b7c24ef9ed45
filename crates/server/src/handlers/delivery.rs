//! Payments, notifications and the courier side of fulfilment.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use model::{
    CourierAssignment, CourierAssignmentRequest, DeliveryHistory, DeliveryHistoryRequest,
    Notification, NotificationRequest, Page, Payment, PaymentRequest,
};
use service::validation;
use uuid::Uuid;

use crate::error::{ApiError, AppJson, AppPath, AppQuery};
use crate::params::ListParams;
use crate::AppState;

pub async fn create_payment(
    State(state): State<AppState>,
    AppJson(req): AppJson<PaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    validation::payment(&req)?;
    let payment = state.repos.payments.create(&req).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn get_payment(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Payment>, ApiError> {
    Ok(Json(state.repos.payments.get_by_id(id).await?))
}

pub async fn list_payments(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<Page<Payment>>, ApiError> {
    let req = params.list(state.lists)?;
    Ok(Json(state.repos.payments.list(&req).await?))
}

pub async fn update_payment(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<PaymentRequest>,
) -> Result<Json<Payment>, ApiError> {
    validation::payment(&req)?;
    Ok(Json(state.repos.payments.update(id, &req).await?))
}

pub async fn delete_payment(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.repos.payments.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_notification(
    State(state): State<AppState>,
    AppJson(req): AppJson<NotificationRequest>,
) -> Result<(StatusCode, Json<Notification>), ApiError> {
    validation::notification(&req)?;
    let notification = state.repos.notifications.create(&req).await?;
    Ok((StatusCode::CREATED, Json(notification)))
}

pub async fn get_notification(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Notification>, ApiError> {
    Ok(Json(state.repos.notifications.get_by_id(id).await?))
}

pub async fn list_notifications(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<Page<Notification>>, ApiError> {
    let req = params.list(state.lists)?;
    Ok(Json(state.repos.notifications.list(&req).await?))
}

pub async fn update_notification(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<NotificationRequest>,
) -> Result<Json<Notification>, ApiError> {
    validation::notification(&req)?;
    Ok(Json(state.repos.notifications.update(id, &req).await?))
}

pub async fn delete_notification(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.repos.notifications.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_assignment(
    State(state): State<AppState>,
    AppJson(req): AppJson<CourierAssignmentRequest>,
) -> Result<(StatusCode, Json<CourierAssignment>), ApiError> {
    validation::courier_assignment(&req)?;
    let assignment = state.repos.courier_assignments.create(&req).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

pub async fn get_assignment(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<CourierAssignment>, ApiError> {
    Ok(Json(state.repos.courier_assignments.get_by_id(id).await?))
}

pub async fn list_assignments(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<Page<CourierAssignment>>, ApiError> {
    let req = params.list(state.lists)?;
    Ok(Json(state.repos.courier_assignments.list(&req).await?))
}

pub async fn update_assignment(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<CourierAssignmentRequest>,
) -> Result<Json<CourierAssignment>, ApiError> {
    validation::courier_assignment(&req)?;
    Ok(Json(state.repos.courier_assignments.update(id, &req).await?))
}

pub async fn delete_assignment(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.repos.courier_assignments.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_history(
    State(state): State<AppState>,
    AppJson(req): AppJson<DeliveryHistoryRequest>,
) -> Result<(StatusCode, Json<DeliveryHistory>), ApiError> {
    validation::delivery_history(&req)?;
    let entry = state.repos.delivery_history.create(&req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn get_history(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<DeliveryHistory>, ApiError> {
    Ok(Json(state.repos.delivery_history.get_by_id(id).await?))
}

pub async fn list_history(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<Page<DeliveryHistory>>, ApiError> {
    let req = params.list(state.lists)?;
    Ok(Json(state.repos.delivery_history.list(&req).await?))
}

pub async fn update_history(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<DeliveryHistoryRequest>,
) -> Result<Json<DeliveryHistory>, ApiError> {
    validation::delivery_history(&req)?;
    Ok(Json(state.repos.delivery_history.update(id, &req).await?))
}

pub async fn delete_history(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.repos.delivery_history.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

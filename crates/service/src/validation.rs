//! Field checks shared by the services and the plain CRUD handlers.

use std::sync::LazyLock;

use model::{
    AdminRequest, BannerRequest, BranchRequest, CategoryRequest, CourierAssignmentRequest,
    DeliveryHistoryRequest, NotificationRequest, PaymentRequest, ProductRequest, UserRequest,
};
use regex::Regex;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::ServiceError;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+998\d{9}$").expect("Invalid phone regex pattern"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("Invalid email regex pattern")
});

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Uzbek mobile number: `+998` followed by nine digits.
pub fn phone(phone: &str) -> Result<(), ServiceError> {
    if !is_valid_phone(phone) {
        return Err(ServiceError::Validation(format!(
            "invalid phone number format: {phone}"
        )));
    }
    Ok(())
}

/// Email is optional; when given it must be well-formed.
pub fn email(email: &str) -> Result<(), ServiceError> {
    if !email.is_empty() && !is_valid_email(email) {
        return Err(ServiceError::Validation(format!("invalid email format: {email}")));
    }
    Ok(())
}

pub fn not_blank(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

pub fn not_negative(field: &str, value: Decimal) -> Result<(), ServiceError> {
    if value < Decimal::ZERO {
        return Err(ServiceError::Validation(format!("{field} must not be negative")));
    }
    Ok(())
}

pub fn reference(field: &str, id: Uuid) -> Result<(), ServiceError> {
    if id.is_nil() {
        return Err(ServiceError::Validation(format!("{field} is required")));
    }
    Ok(())
}

pub fn user(req: &UserRequest) -> Result<(), ServiceError> {
    not_blank("name", &req.name)?;
    phone(&req.phone)?;
    email(&req.email)
}

pub fn admin(req: &AdminRequest) -> Result<(), ServiceError> {
    not_blank("name", &req.name)?;
    phone(&req.phone)?;
    email(&req.email)
}

pub fn category(req: &CategoryRequest) -> Result<(), ServiceError> {
    not_blank("name", &req.name)
}

pub fn product(req: &ProductRequest) -> Result<(), ServiceError> {
    not_blank("name", &req.name)?;
    not_negative("price", req.price)
}

pub fn branch(req: &BranchRequest) -> Result<(), ServiceError> {
    not_blank("name", &req.name)
}

pub fn banner(req: &BannerRequest) -> Result<(), ServiceError> {
    not_blank("image_url", &req.image_url)
}

pub fn notification(req: &NotificationRequest) -> Result<(), ServiceError> {
    reference("user_id", req.user_id)?;
    not_blank("message", &req.message)
}

pub fn payment(req: &PaymentRequest) -> Result<(), ServiceError> {
    reference("user_id", req.user_id)?;
    reference("order_id", req.order_id)
}

pub fn courier_assignment(req: &CourierAssignmentRequest) -> Result<(), ServiceError> {
    reference("order_id", req.order_id)?;
    reference("courier_id", req.courier_id)
}

pub fn delivery_history(req: &DeliveryHistoryRequest) -> Result<(), ServiceError> {
    reference("courier_id", req.courier_id)?;
    reference("order_id", req.order_id)?;
    not_negative("earnings", req.earnings)
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment: how an order is paid and whether the payment went through.
/// No gateway is involved; the flag is set by the client or an operator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_id: Uuid,
    pub is_paid: bool,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentRequest {
    pub user_id: Uuid,
    pub order_id: Uuid,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub payment_method: String,
}

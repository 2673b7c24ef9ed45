use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// CourierAssignment: which courier carries which order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourierAssignment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub courier_id: Uuid,
    pub status: String,
    pub assigned_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourierAssignmentRequest {
    pub order_id: Uuid,
    pub courier_id: Uuid,
    #[serde(default)]
    pub status: String,
}

/// DeliveryHistory: a completed delivery and what the courier earned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryHistory {
    pub id: Uuid,
    pub courier_id: Uuid,
    pub order_id: Uuid,
    pub earnings: Decimal,
    pub delivered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryHistoryRequest {
    pub courier_id: Uuid,
    pub order_id: Uuid,
    pub earnings: Decimal,
    /// Defaults to the moment the record is stored.
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
}

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::page::ListRequest;
use crate::pricing::{LineItemRequest, UpdateLineItem};

/// OrderStatus: lifecycle of an order as seen by the kitchen and courier.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    PickedUp,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::Delivered => "delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "picked_up" => Ok(OrderStatus::PickedUp),
            "delivered" => Ok(OrderStatus::Delivered),
            other => Err(format!("invalid status value: {other}")),
        }
    }
}

/// Order: the parent row. `total_price` is the stored sum of the item
/// totals at the time they were priced; it is never re-derived on read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_price: Decimal,
    pub delivery_status: String,
    pub status: OrderStatus,
    pub longitude: f64,
    pub latitude: f64,
    pub address_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// OrderItem: one line of an order with its price snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// OrderDetails: an order together with all of its live items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Parent fields of a new order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewOrder {
    pub user_id: Uuid,
    #[serde(default)]
    pub delivery_status: String,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub address_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateOrderRequest {
    pub order: NewOrder,
    pub items: Vec<LineItemRequest>,
}

/// Replacement parent fields plus lines to update or insert.
///
/// Stored items missing from `items` are left untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateOrderRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub delivery_status: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub address_name: String,
    #[serde(default)]
    pub items: Vec<UpdateLineItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderListRequest {
    pub list: ListRequest,
    pub user_id: Option<Uuid>,
}

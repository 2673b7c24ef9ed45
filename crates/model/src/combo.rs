use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing::{LineItemRequest, UpdateLineItem};

/// Combo: a bundle of products sold together.
///
/// `price` is what the operator advertises; `total_price` is the stored sum
/// of the bundled items' snapshot totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Combo {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComboItem {
    pub id: Uuid,
    pub combo_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComboDetails {
    pub combo: Combo,
    pub items: Vec<ComboItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCombo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateComboRequest {
    pub combo: NewCombo,
    pub items: Vec<LineItemRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateComboRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub items: Vec<UpdateLineItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_create_combo_with_numeric_price() {
        let json = r#"
        {
            "combo": { "name": "Lunch set", "price": 45000.5 },
            "items": [{ "product_id": "0b8e1f59-2f3b-4b0e-8a7c-6c0f5f9b5a01", "quantity": 1 }]
        }
        "#;
        let req: CreateComboRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.combo.name, "Lunch set");
        assert_eq!(req.combo.description, "");
        assert_eq!(req.combo.price, Decimal::new(450005, 1));
    }

    #[test]
    fn update_line_without_id_is_an_insert() {
        let json = r#"
        {
            "name": "Lunch set",
            "price": 10,
            "items": [
                { "id": "9a0d2c7e-1b7f-4e7a-a1b9-3a2f4b6c8d02", "product_id": "0b8e1f59-2f3b-4b0e-8a7c-6c0f5f9b5a01", "quantity": 3 },
                { "product_id": "0b8e1f59-2f3b-4b0e-8a7c-6c0f5f9b5a01", "quantity": 1 }
            ]
        }
        "#;
        let req: UpdateComboRequest = serde_json::from_str(json).unwrap();
        assert!(req.items[0].id.is_some());
        assert!(req.items[1].id.is_none());
    }
}

use bigdecimal::BigDecimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::price;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PaymentStatus {
    Paid,
    #[default]
    Unpaid,
}

impl PaymentStatus {
    pub fn toggled(self) -> Self {
        match self {
            PaymentStatus::Paid => PaymentStatus::Unpaid,
            PaymentStatus::Unpaid => PaymentStatus::Paid,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum DeliveryStatus {
    Delivered,
    #[default]
    Pending,
}

impl DeliveryStatus {
    pub fn toggled(self) -> Self {
        match self {
            DeliveryStatus::Delivered => DeliveryStatus::Pending,
            DeliveryStatus::Pending => DeliveryStatus::Delivered,
        }
    }
}

/// One fundraiser order, in the shape it is persisted.
///
/// Only `id` is required when reading. Every other field that is missing or
/// has the wrong type falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(default, deserialize_with = "or_default")]
    pub order_number: String,
    #[serde(default, deserialize_with = "or_default")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "or_default")]
    pub phone_number: String,
    #[serde(default, deserialize_with = "or_default")]
    pub items: String,
    #[serde(default, with = "price::json_number")]
    pub total_price: BigDecimal,
    #[serde(default, deserialize_with = "status_or_default")]
    pub payment_status: PaymentStatus,
    #[serde(default, deserialize_with = "status_or_default")]
    pub delivery_status: DeliveryStatus,
    #[serde(default, deserialize_with = "or_default")]
    pub notes: String,
    /// Epoch milliseconds.
    #[serde(default, deserialize_with = "or_default")]
    pub created_at: i64,
}

fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).unwrap_or_default())
}

/// Like [`or_default`], but also accepts a status in any letter case.
fn status_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = match Value::deserialize(deserializer)? {
        Value::String(s) => {
            let lower = s.trim().to_lowercase();
            let mut chars = lower.chars();
            let name = match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            };
            Value::String(name)
        }
        other => other,
    };
    Ok(serde_json::from_value(raw).unwrap_or_default())
}

/// The user-editable part of an order.
///
/// `total_price` is kept as raw input; the store normalizes it on every write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderInput {
    pub customer_name: String,
    pub phone_number: String,
    pub items: String,
    pub total_price: Value,
    pub payment_status: PaymentStatus,
    pub delivery_status: DeliveryStatus,
    pub notes: String,
}

impl Order {
    /// Overwrite the mutable fields. Identity and creation time stay put.
    pub fn apply_input(&mut self, input: OrderInput) {
        self.customer_name = input.customer_name;
        self.phone_number = input.phone_number;
        self.items = input.items;
        self.total_price = price::normalize_price(&input.total_price);
        self.payment_status = input.payment_status;
        self.delivery_status = input.delivery_status;
        self.notes = input.notes;
    }
}

pub fn order_number_for(position: usize) -> String {
    format!("ORD-{:03}", position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::Zero;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn statuses_toggle_back_and_forth() {
        assert_eq!(PaymentStatus::Paid.toggled(), PaymentStatus::Unpaid);
        assert_eq!(PaymentStatus::Unpaid.toggled().toggled(), PaymentStatus::Unpaid);
        assert_eq!(DeliveryStatus::Pending.toggled(), DeliveryStatus::Delivered);
        assert_eq!(DeliveryStatus::Delivered.toggled().toggled(), DeliveryStatus::Delivered);
    }

    #[test]
    fn order_numbers_are_zero_padded() {
        assert_eq!(order_number_for(4), "ORD-004");
        assert_eq!(order_number_for(1234), "ORD-1234");
    }

    #[test]
    fn persisted_shape_uses_camel_case() {
        let order = Order {
            id: "1".to_string(),
            order_number: "ORD-001".to_string(),
            customer_name: "John Doe".to_string(),
            phone_number: "555-1234".to_string(),
            items: "2x Cookies".to_string(),
            total_price: BigDecimal::from_str("18.00").expect("decimal"),
            payment_status: PaymentStatus::Unpaid,
            delivery_status: DeliveryStatus::Delivered,
            notes: String::new(),
            created_at: 1_700_000_000_000,
        };

        let value = serde_json::to_value(&order).expect("serialize");
        assert_eq!(value["orderNumber"], "ORD-001");
        assert_eq!(value["totalPrice"], json!(18.0));
        assert_eq!(value["paymentStatus"], "Unpaid");
        assert_eq!(value["deliveryStatus"], "Delivered");
        assert_eq!(value["createdAt"], json!(1_700_000_000_000_i64));
    }

    #[test]
    fn corrupt_price_in_persisted_record_reads_as_zero() {
        let raw = json!({
            "id": "x",
            "orderNumber": "ORD-009",
            "customerName": "Sam",
            "items": "1x Pie",
            "totalPrice": "twelve",
            "paymentStatus": "Paid",
            "deliveryStatus": "Pending",
            "createdAt": 5
        });

        let order: Order = serde_json::from_value(raw).expect("parse");
        assert_eq!(order.total_price, BigDecimal::zero());
        assert_eq!(order.phone_number, "");
        assert_eq!(order.notes, "");
    }

    #[test]
    fn damaged_fields_fall_back_to_defaults() {
        let raw = json!({
            "id": "y",
            "customerName": 42,
            "paymentStatus": "settled",
            "deliveryStatus": "delivered",
            "createdAt": "yesterday"
        });

        let order: Order = serde_json::from_value(raw).expect("parse");
        assert_eq!(order.customer_name, "");
        assert_eq!(order.order_number, "");
        assert_eq!(order.payment_status, PaymentStatus::Unpaid);
        assert_eq!(order.delivery_status, DeliveryStatus::Delivered);
        assert_eq!(order.created_at, 0);
    }

    #[test]
    fn record_without_id_is_rejected() {
        let raw = json!({ "customerName": "Nobody", "createdAt": 1 });
        assert!(serde_json::from_value::<Order>(raw).is_err());
    }

    #[test]
    fn apply_input_keeps_identity() {
        let mut order = Order {
            id: "abc".to_string(),
            order_number: "ORD-002".to_string(),
            customer_name: "Mary".to_string(),
            phone_number: String::new(),
            items: "3x Cupcakes".to_string(),
            total_price: BigDecimal::from(9),
            payment_status: PaymentStatus::Paid,
            delivery_status: DeliveryStatus::Pending,
            notes: String::new(),
            created_at: 42,
        };

        order.apply_input(OrderInput {
            customer_name: "Mary Kia".to_string(),
            items: "4x Cupcakes".to_string(),
            total_price: json!("12"),
            ..OrderInput::default()
        });

        assert_eq!(order.id, "abc");
        assert_eq!(order.order_number, "ORD-002");
        assert_eq!(order.created_at, 42);
        assert_eq!(order.customer_name, "Mary Kia");
        assert_eq!(order.total_price, BigDecimal::from(12));
        assert_eq!(order.payment_status, PaymentStatus::Unpaid);
    }
}

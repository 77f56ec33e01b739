use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::domain::order::{DeliveryStatus, Order, PaymentStatus};

/// Example orders used when nothing has been stored yet.
pub fn seed_orders(now: i64) -> Vec<Order> {
    vec![
        seed(
            "1",
            "John Doe",
            "555-1234",
            "2x Cookies, 1x Brownies",
            "18.00",
            PaymentStatus::Unpaid,
            DeliveryStatus::Delivered,
            "Leave at front desk",
            now - 100_000,
        ),
        seed(
            "2",
            "Mary Kia",
            "555-8090",
            "3x Cupcakes",
            "9.00",
            PaymentStatus::Paid,
            DeliveryStatus::Pending,
            "Needs delivery after school",
            now,
        ),
        seed(
            "3",
            "Alex Smith",
            "555-0000",
            "1x Soda",
            "2.00",
            PaymentStatus::Unpaid,
            DeliveryStatus::Pending,
            "",
            now - 50_000,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn seed(
    id: &str,
    customer_name: &str,
    phone_number: &str,
    items: &str,
    total_price: &str,
    payment_status: PaymentStatus,
    delivery_status: DeliveryStatus,
    notes: &str,
    created_at: i64,
) -> Order {
    Order {
        id: id.to_string(),
        order_number: format!("ORD-{:0>3}", id),
        customer_name: customer_name.to_string(),
        phone_number: phone_number.to_string(),
        items: items.to_string(),
        total_price: BigDecimal::from_str(total_price).unwrap_or_default(),
        payment_status,
        delivery_status,
        notes: notes.to_string(),
        created_at,
    }
}

use bigdecimal::{BigDecimal, Zero};

use crate::domain::order::{DeliveryStatus, Order, PaymentStatus};
use crate::domain::price::sanitize_price;

/// Summary figures for the dashboard. Always derived, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderStats {
    pub total_sales: BigDecimal,
    pub total_orders: usize,
    pub paid_orders: usize,
    pub unpaid_orders: usize,
    pub delivered_orders: usize,
    pub pending_orders: usize,
}

impl Default for OrderStats {
    fn default() -> Self {
        Self {
            total_sales: BigDecimal::zero(),
            total_orders: 0,
            paid_orders: 0,
            unpaid_orders: 0,
            delivered_orders: 0,
            pending_orders: 0,
        }
    }
}

pub fn aggregate(orders: &[Order]) -> OrderStats {
    orders.iter().fold(OrderStats::default(), |mut acc, order| {
        acc.total_sales += sanitize_price(&order.total_price);
        acc.total_orders += 1;
        match order.payment_status {
            PaymentStatus::Paid => acc.paid_orders += 1,
            PaymentStatus::Unpaid => acc.unpaid_orders += 1,
        }
        match order.delivery_status {
            DeliveryStatus::Delivered => acc.delivered_orders += 1,
            DeliveryStatus::Pending => acc.pending_orders += 1,
        }
        acc
    })
}

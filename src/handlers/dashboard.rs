use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::application::stats::{aggregate, OrderStats};
use crate::domain::price::format_amount;
use crate::errors::AppError;

/// One slice of a two-part breakdown chart.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Segment {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    /// Sum of all order totals, two decimal places.
    pub total_sales: String,
    pub total_orders: usize,
    pub paid_orders: usize,
    pub unpaid_orders: usize,
    pub delivered_orders: usize,
    pub pending_orders: usize,
    pub payment_breakdown: Vec<Segment>,
    pub delivery_breakdown: Vec<Segment>,
}

fn segment(name: &str, value: usize) -> Segment {
    Segment {
        name: name.to_string(),
        value,
    }
}

impl From<OrderStats> for DashboardResponse {
    fn from(stats: OrderStats) -> Self {
        DashboardResponse {
            total_sales: format_amount(&stats.total_sales),
            total_orders: stats.total_orders,
            paid_orders: stats.paid_orders,
            unpaid_orders: stats.unpaid_orders,
            delivered_orders: stats.delivered_orders,
            pending_orders: stats.pending_orders,
            payment_breakdown: vec![
                segment("Paid", stats.paid_orders),
                segment("Unpaid", stats.unpaid_orders),
            ],
            delivery_breakdown: vec![
                segment("Delivered", stats.delivered_orders),
                segment("Pending", stats.pending_orders),
            ],
        }
    }
}

/// GET /dashboard
///
/// Sales totals and status breakdowns over every order.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Current statistics", body = DashboardResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "dashboard"
)]
pub async fn get_dashboard(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let stats = aggregate(state.store()?.orders());
    Ok(HttpResponse::Ok().json(DashboardResponse::from(stats)))
}

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::application::view::view;
use crate::domain::order::{DeliveryStatus, Order, OrderInput, PaymentStatus};
use crate::domain::price::format_amount;
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderRequest {
    pub customer_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub items: String,
    /// Number or numeric string, e.g. `9.99` or `"9.99"`. Anything else is stored as 0.
    #[serde(default)]
    #[schema(value_type = f64)]
    pub total_price: Value,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub delivery_status: DeliveryStatus,
    #[serde(default)]
    pub notes: String,
}

impl From<OrderRequest> for OrderInput {
    fn from(r: OrderRequest) -> Self {
        OrderInput {
            customer_name: r.customer_name,
            phone_number: r.phone_number,
            items: r.items,
            total_price: r.total_price,
            payment_status: r.payment_status,
            delivery_status: r.delivery_status,
            notes: r.notes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: String,
    pub order_number: String,
    pub customer_name: String,
    pub phone_number: String,
    pub items: String,
    /// Decimal amount with two places, e.g. "18.00"
    pub total_price: String,
    pub payment_status: PaymentStatus,
    pub delivery_status: DeliveryStatus,
    pub notes: String,
    pub created_at: String,
}

impl From<&Order> for OrderResponse {
    fn from(o: &Order) -> Self {
        OrderResponse {
            id: o.id.clone(),
            order_number: o.order_number.clone(),
            customer_name: o.customer_name.clone(),
            phone_number: o.phone_number.clone(),
            items: o.items.clone(),
            total_price: format_amount(&o.total_price),
            payment_status: o.payment_status,
            delivery_status: o.delivery_status,
            notes: o.notes.clone(),
            created_at: DateTime::<Utc>::from_timestamp_millis(o.created_at)
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| o.created_at.to_string()),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Case-insensitive match on customer name or order number.
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: usize,
}

/// Name and items are the only fields a save cannot do without.
pub(crate) fn require_fields(customer_name: &str, items: &str) -> Result<(), AppError> {
    if customer_name.trim().is_empty() {
        return Err(AppError::BadRequest("customer_name is required".to_string()));
    }
    if items.trim().is_empty() {
        return Err(AppError::BadRequest("items is required".to_string()));
    }
    Ok(())
}

fn changed_or_no_content(order: Option<Order>) -> HttpResponse {
    match order {
        Some(order) => HttpResponse::Ok().json(OrderResponse::from(&order)),
        None => HttpResponse::NoContent().finish(),
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /orders
///
/// Orders matching `q`, newest first.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("q" = Option<String>, Query, description = "Search on customer name or order number"),
    ),
    responses(
        (status = 200, description = "Matching orders", body = ListOrdersResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let store = state.store()?;
    let items: Vec<OrderResponse> = view(store.orders(), &query.q)
        .into_iter()
        .map(OrderResponse::from)
        .collect();
    let total = items.len();
    Ok(HttpResponse::Ok().json(ListOrdersResponse { items, total }))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let store = state.store()?;
    match store.get(&path) {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(AppError::NotFound),
    }
}

/// POST /orders
///
/// Creates an order. The price is normalized, never rejected.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = OrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Missing customer name or items"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<OrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    require_fields(&body.customer_name, &body.items)?;

    let order = web::block(move || {
        let mut store = state.store()?;
        let result = store.create(body.into())?;
        Ok::<_, AppError>(result)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from(&order)))
}

/// PUT /orders/{id}
///
/// Replaces the editable fields. Unknown ids are ignored (204).
#[utoipa::path(
    put,
    path = "/orders/{id}",
    params(("id" = String, Path, description = "Order id")),
    request_body = OrderRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 204, description = "No such order, nothing changed"),
        (status = 400, description = "Missing customer name or items"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<OrderRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    require_fields(&body.customer_name, &body.items)?;

    let updated = web::block(move || {
        let mut store = state.store()?;
        let result = store.update(&id, body.into())?;
        Ok::<_, AppError>(result)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(changed_or_no_content(updated))
}

/// DELETE /orders/{id}
///
/// Immediate and irreversible; unknown ids are ignored.
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(("id" = String, Path, description = "Order id")),
    responses((status = 204, description = "Order removed (or never existed)")),
    tag = "orders"
)]
pub async fn delete_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    web::block(move || {
        let mut store = state.store()?;
        let result = store.delete(&id)?;
        Ok::<_, AppError>(result)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /orders/{id}/toggle-payment
#[utoipa::path(
    post,
    path = "/orders/{id}/toggle-payment",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Payment status flipped", body = OrderResponse),
        (status = 204, description = "No such order, nothing changed"),
    ),
    tag = "orders"
)]
pub async fn toggle_payment(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let updated = web::block(move || {
        let mut store = state.store()?;
        let result = store.toggle_payment(&id)?;
        Ok::<_, AppError>(result)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(changed_or_no_content(updated))
}

/// POST /orders/{id}/toggle-delivery
#[utoipa::path(
    post,
    path = "/orders/{id}/toggle-delivery",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Delivery status flipped", body = OrderResponse),
        (status = 204, description = "No such order, nothing changed"),
    ),
    tag = "orders"
)]
pub async fn toggle_delivery(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let updated = web::block(move || {
        let mut store = state.store()?;
        let result = store.toggle_delivery(&id)?;
        Ok::<_, AppError>(result)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(changed_or_no_content(updated))
}

pub mod dashboard;
pub mod form;
pub mod orders;

use actix_web::web;
use utoipa::OpenApi;

use crate::domain::order::{DeliveryStatus, PaymentStatus};

#[derive(OpenApi)]
#[openapi(
    paths(
        dashboard::get_dashboard,
        orders::list_orders,
        orders::get_order,
        orders::create_order,
        orders::update_order,
        orders::delete_order,
        orders::toggle_payment,
        orders::toggle_delivery,
        form::get_form,
        form::start_new,
        form::start_edit,
        form::update_draft,
        form::quick_fill,
        form::save,
    ),
    components(schemas(
        PaymentStatus,
        DeliveryStatus,
        dashboard::DashboardResponse,
        dashboard::Segment,
        orders::OrderRequest,
        orders::OrderResponse,
        orders::ListOrdersResponse,
        form::DraftBody,
        form::FormResponse,
        form::QuickFillView,
        form::QuickFillRequest,
    )),
    tags(
        (name = "dashboard", description = "Sales statistics"),
        (name = "orders", description = "Order records"),
        (name = "form", description = "New/edit order form with quick fill"),
    )
)]
pub struct ApiDoc;

/// Register every API route on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(dashboard::get_dashboard))
        .service(
            web::scope("/orders")
                .route("", web::get().to(orders::list_orders))
                .route("", web::post().to(orders::create_order))
                .route("/{id}", web::get().to(orders::get_order))
                .route("/{id}", web::put().to(orders::update_order))
                .route("/{id}", web::delete().to(orders::delete_order))
                .route("/{id}/toggle-payment", web::post().to(orders::toggle_payment))
                .route("/{id}/toggle-delivery", web::post().to(orders::toggle_delivery)),
        )
        .service(
            web::scope("/form")
                .route("", web::get().to(form::get_form))
                .route("", web::put().to(form::update_draft))
                .route("/new", web::post().to(form::start_new))
                .route("/edit/{id}", web::post().to(form::start_edit))
                .route("/quick-fill", web::post().to(form::quick_fill))
                .route("/save", web::post().to(form::save)),
        );
}

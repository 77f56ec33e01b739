use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::application::order_form::{
    FormSession, OrderDraft, QuickFillOutcome, QuickFillState, Ticket,
};
use crate::domain::order::{DeliveryStatus, PaymentStatus};
use crate::errors::AppError;

use super::orders::{require_fields, OrderResponse};

// ── DTOs ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DraftBody {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub items: String,
    /// Price exactly as typed.
    #[serde(default)]
    pub total_price: String,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub delivery_status: DeliveryStatus,
    #[serde(default)]
    pub notes: String,
}

impl From<&OrderDraft> for DraftBody {
    fn from(d: &OrderDraft) -> Self {
        DraftBody {
            customer_name: d.customer_name.clone(),
            phone_number: d.phone_number.clone(),
            items: d.items.clone(),
            total_price: d.total_price.clone(),
            payment_status: d.payment_status,
            delivery_status: d.delivery_status,
            notes: d.notes.clone(),
        }
    }
}

impl From<DraftBody> for OrderDraft {
    fn from(b: DraftBody) -> Self {
        OrderDraft {
            customer_name: b.customer_name,
            phone_number: b.phone_number,
            items: b.items,
            total_price: b.total_price,
            payment_status: b.payment_status,
            delivery_status: b.delivery_status,
            notes: b.notes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuickFillView {
    /// One of `idle`, `pending`, `filled`, `no_result`, `failed`.
    pub status: String,
    pub message: Option<String>,
}

impl From<&QuickFillState> for QuickFillView {
    fn from(state: &QuickFillState) -> Self {
        let (status, message) = match state {
            QuickFillState::Idle => ("idle", None),
            QuickFillState::Pending => ("pending", None),
            QuickFillState::Resolved(QuickFillOutcome::Filled) => ("filled", None),
            QuickFillState::Resolved(QuickFillOutcome::NoResult) => ("no_result", None),
            QuickFillState::Resolved(QuickFillOutcome::Failed(msg)) => ("failed", Some(msg.clone())),
        };
        QuickFillView {
            status: status.to_string(),
            message,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FormResponse {
    /// `new` or `edit`.
    pub mode: String,
    pub editing_id: Option<String>,
    pub draft: DraftBody,
    pub quick_fill: QuickFillView,
}

impl From<&FormSession> for FormResponse {
    fn from(session: &FormSession) -> Self {
        FormResponse {
            mode: if session.editing.is_some() { "edit" } else { "new" }.to_string(),
            editing_id: session.editing.clone(),
            draft: DraftBody::from(&session.draft),
            quick_fill: QuickFillView::from(session.quick_fill.state()),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct QuickFillRequest {
    pub prompt: String,
}

/// Holds a running quick fill. If the request future is dropped before the
/// extraction returns, the quick fill goes back to idle.
struct InFlight {
    state: web::Data<AppState>,
    ticket: Ticket,
    settled: bool,
}

impl InFlight {
    fn settle(mut self) -> Ticket {
        self.settled = true;
        self.ticket
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        match self.state.form() {
            Ok(mut form) => {
                if form.quick_fill.abandon(self.ticket) {
                    log::warn!("Quick fill request dropped before the extraction returned");
                }
            }
            Err(e) => log::error!("Could not release quick fill: {}", e),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /form
#[utoipa::path(
    get,
    path = "/form",
    responses((status = 200, description = "Current form", body = FormResponse)),
    tag = "form"
)]
pub async fn get_form(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let form = state.form()?;
    Ok(HttpResponse::Ok().json(FormResponse::from(&*form)))
}

/// POST /form/new
///
/// Blank form for a new order. Any running quick fill is abandoned.
#[utoipa::path(
    post,
    path = "/form/new",
    responses((status = 200, description = "Blank form", body = FormResponse)),
    tag = "form"
)]
pub async fn start_new(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let mut form = state.form()?;
    form.start_new();
    Ok(HttpResponse::Ok().json(FormResponse::from(&*form)))
}

/// POST /form/edit/{id}
#[utoipa::path(
    post,
    path = "/form/edit/{id}",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Form filled from the order", body = FormResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "form"
)]
pub async fn start_edit(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order = state.store()?.get(&path).cloned().ok_or(AppError::NotFound)?;
    let mut form = state.form()?;
    form.start_edit(&order);
    Ok(HttpResponse::Ok().json(FormResponse::from(&*form)))
}

/// PUT /form
///
/// Replace the draft with what the user has typed.
#[utoipa::path(
    put,
    path = "/form",
    request_body = DraftBody,
    responses((status = 200, description = "Updated form", body = FormResponse)),
    tag = "form"
)]
pub async fn update_draft(
    state: web::Data<AppState>,
    body: web::Json<DraftBody>,
) -> Result<HttpResponse, AppError> {
    let mut form = state.form()?;
    form.draft = body.into_inner().into();
    Ok(HttpResponse::Ok().json(FormResponse::from(&*form)))
}

/// POST /form/quick-fill
///
/// Sends the prompt to the extraction service and pre-fills the draft. A
/// failed extraction is reported in `quick_fill` and leaves the draft as it
/// was; nothing is saved.
#[utoipa::path(
    post,
    path = "/form/quick-fill",
    request_body = QuickFillRequest,
    responses(
        (status = 200, description = "Form after the extraction attempt", body = FormResponse),
        (status = 400, description = "Blank prompt, or the form is editing an existing order"),
        (status = 409, description = "A quick fill is already running"),
    ),
    tag = "form"
)]
pub async fn quick_fill(
    state: web::Data<AppState>,
    body: web::Json<QuickFillRequest>,
) -> Result<HttpResponse, AppError> {
    let prompt = body.into_inner().prompt;

    let in_flight = {
        let mut form = state.form()?;
        if form.editing.is_some() {
            return Err(AppError::BadRequest(
                "Quick fill is only available for new orders".to_string(),
            ));
        }
        InFlight {
            state: state.clone(),
            ticket: form.quick_fill.begin(&prompt)?,
            settled: false,
        }
    };

    let result = state.extractor().extract(&prompt).await;
    let ticket = in_flight.settle();

    let mut form = state.form()?;
    let session = &mut *form;
    if !session.quick_fill.finish(ticket, result, &mut session.draft) {
        log::info!("Quick fill finished after the form was reset; result dropped");
    }
    Ok(HttpResponse::Ok().json(FormResponse::from(&*session)))
}

/// POST /form/save
///
/// Creates or updates the order from the draft, then resets the form.
#[utoipa::path(
    post,
    path = "/form/save",
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 204, description = "Edited order no longer exists, nothing saved"),
        (status = 400, description = "Missing customer name or items"),
    ),
    tag = "form"
)]
pub async fn save(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let (editing, saved) = web::block(move || {
        let mut form = state.form()?;
        require_fields(&form.draft.customer_name, &form.draft.items)?;
        let input = form.draft.to_input();
        let editing = form.editing.clone();

        let mut store = state.store()?;
        let saved = match &editing {
            Some(id) => store.update(id, input)?,
            None => Some(store.create(input)?),
        };
        form.start_new();
        Ok::<_, AppError>((editing, saved))
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(match (editing, saved) {
        (None, Some(order)) => HttpResponse::Created().json(OrderResponse::from(&order)),
        (Some(_), Some(order)) => HttpResponse::Ok().json(OrderResponse::from(&order)),
        (_, None) => HttpResponse::NoContent().finish(),
    })
}

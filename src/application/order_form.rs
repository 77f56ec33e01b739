use serde_json::Value;
use thiserror::Error;

use crate::domain::errors::ExtractionError;
use crate::domain::extraction::ParsedOrder;
use crate::domain::order::{DeliveryStatus, Order, OrderInput, PaymentStatus};
use crate::domain::price::format_amount;

pub const QUICK_FILL_FAILED: &str = "Failed to parse. Please try again or enter manually.";

/// Field values of the new/edit order form as the user typed them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDraft {
    pub customer_name: String,
    pub phone_number: String,
    pub items: String,
    pub total_price: String,
    pub payment_status: PaymentStatus,
    pub delivery_status: DeliveryStatus,
    pub notes: String,
}

impl OrderDraft {
    pub fn from_order(order: &Order) -> Self {
        Self {
            customer_name: order.customer_name.clone(),
            phone_number: order.phone_number.clone(),
            items: order.items.clone(),
            total_price: order.total_price.to_string(),
            payment_status: order.payment_status,
            delivery_status: order.delivery_status,
            notes: order.notes.clone(),
        }
    }

    /// Copy extracted fields over the draft. Statuses are left as chosen.
    pub fn apply_extraction(&mut self, parsed: &ParsedOrder) {
        self.customer_name = parsed.customer_name.clone();
        self.phone_number = parsed.phone_number.clone();
        self.items = parsed.items.clone();
        self.total_price = format_amount(&parsed.total_price);
        self.notes = parsed.notes.clone();
    }

    pub fn to_input(&self) -> OrderInput {
        OrderInput {
            customer_name: self.customer_name.clone(),
            phone_number: self.phone_number.clone(),
            items: self.items.clone(),
            total_price: Value::String(self.total_price.clone()),
            payment_status: self.payment_status,
            delivery_status: self.delivery_status,
            notes: self.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuickFillOutcome {
    Filled,
    NoResult,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum QuickFillState {
    #[default]
    Idle,
    Pending,
    Resolved(QuickFillOutcome),
}

#[derive(Debug, Error, PartialEq)]
pub enum QuickFillError {
    #[error("Enter some text to quick fill from")]
    EmptyPrompt,
    #[error("A quick fill is already running")]
    AlreadyPending,
}

/// Identifies one quick fill request; results carrying an old ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct QuickFill {
    state: QuickFillState,
    generation: u64,
}

impl QuickFill {
    pub fn state(&self) -> &QuickFillState {
        &self.state
    }

    pub fn begin(&mut self, prompt: &str) -> Result<Ticket, QuickFillError> {
        if prompt.trim().is_empty() {
            return Err(QuickFillError::EmptyPrompt);
        }
        if self.state == QuickFillState::Pending {
            return Err(QuickFillError::AlreadyPending);
        }
        self.generation += 1;
        self.state = QuickFillState::Pending;
        Ok(Ticket(self.generation))
    }

    /// Record the extraction result. Returns `false` when the ticket is stale
    /// and the result was discarded.
    pub fn finish(
        &mut self,
        ticket: Ticket,
        result: Result<Option<ParsedOrder>, ExtractionError>,
        draft: &mut OrderDraft,
    ) -> bool {
        if ticket.0 != self.generation || self.state != QuickFillState::Pending {
            log::debug!("Discarding stale quick fill result");
            return false;
        }
        let outcome = match result {
            Ok(Some(parsed)) => {
                draft.apply_extraction(&parsed);
                QuickFillOutcome::Filled
            }
            Ok(None) => QuickFillOutcome::NoResult,
            Err(e) => {
                log::error!("Quick fill failed: {}", e);
                QuickFillOutcome::Failed(QUICK_FILL_FAILED.to_string())
            }
        };
        self.state = QuickFillState::Resolved(outcome);
        true
    }

    /// Give up on a request that will never call [`QuickFill::finish`].
    /// Returns `false` when the ticket was already settled or superseded.
    pub fn abandon(&mut self, ticket: Ticket) -> bool {
        if ticket.0 != self.generation || self.state != QuickFillState::Pending {
            return false;
        }
        self.state = QuickFillState::Idle;
        true
    }

    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = QuickFillState::Idle;
    }
}

/// The single form the user is working on.
#[derive(Debug, Default)]
pub struct FormSession {
    pub draft: OrderDraft,
    pub editing: Option<String>,
    pub quick_fill: QuickFill,
}

impl FormSession {
    pub fn start_new(&mut self) {
        self.draft = OrderDraft::default();
        self.editing = None;
        self.quick_fill.reset();
    }

    pub fn start_edit(&mut self, order: &Order) {
        self.draft = OrderDraft::from_order(order);
        self.editing = Some(order.id.clone());
        self.quick_fill.reset();
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;

    fn parsed() -> ParsedOrder {
        ParsedOrder {
            customer_name: "John".to_string(),
            phone_number: "555-1234".to_string(),
            items: "2x Cookies, 1x Brownie".to_string(),
            total_price: BigDecimal::from_str("15").unwrap(),
            notes: String::new(),
        }
    }

    #[test]
    fn blank_prompt_is_rejected() {
        let mut quick_fill = QuickFill::default();
        assert_eq!(quick_fill.begin("   "), Err(QuickFillError::EmptyPrompt));
        assert_eq!(quick_fill.state(), &QuickFillState::Idle);
    }

    #[test]
    fn second_trigger_while_pending_is_rejected() {
        let mut quick_fill = QuickFill::default();
        quick_fill.begin("John wants cookies").expect("begin");

        assert_eq!(quick_fill.begin("again"), Err(QuickFillError::AlreadyPending));
        assert_eq!(quick_fill.state(), &QuickFillState::Pending);
    }

    #[test]
    fn success_fills_the_draft() {
        let mut quick_fill = QuickFill::default();
        let mut draft = OrderDraft {
            payment_status: PaymentStatus::Paid,
            ..OrderDraft::default()
        };
        let ticket = quick_fill.begin("John wants cookies").expect("begin");

        assert!(quick_fill.finish(ticket, Ok(Some(parsed())), &mut draft));

        assert_eq!(quick_fill.state(), &QuickFillState::Resolved(QuickFillOutcome::Filled));
        assert_eq!(draft.customer_name, "John");
        assert_eq!(draft.total_price, "15.00");
        assert_eq!(draft.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn no_result_leaves_draft_alone() {
        let mut quick_fill = QuickFill::default();
        let mut draft = OrderDraft {
            customer_name: "Typed".to_string(),
            ..OrderDraft::default()
        };
        let ticket = quick_fill.begin("???").expect("begin");

        quick_fill.finish(ticket, Ok(None), &mut draft);

        assert_eq!(quick_fill.state(), &QuickFillState::Resolved(QuickFillOutcome::NoResult));
        assert_eq!(draft.customer_name, "Typed");
    }

    #[test]
    fn failure_keeps_fields_and_allows_retry() {
        let mut quick_fill = QuickFill::default();
        let mut draft = OrderDraft {
            items: "3x Cupcakes".to_string(),
            ..OrderDraft::default()
        };
        let ticket = quick_fill.begin("Mary cupcakes").expect("begin");

        quick_fill.finish(ticket, Err(ExtractionError::Timeout), &mut draft);

        assert_eq!(
            quick_fill.state(),
            &QuickFillState::Resolved(QuickFillOutcome::Failed(QUICK_FILL_FAILED.to_string()))
        );
        assert_eq!(draft.items, "3x Cupcakes");
        assert!(quick_fill.begin("Mary cupcakes").is_ok());
    }

    #[test]
    fn result_after_reset_is_discarded() {
        let mut session = FormSession::default();
        let ticket = session.quick_fill.begin("John wants cookies").expect("begin");

        session.start_new();
        let applied = session
            .quick_fill
            .finish(ticket, Ok(Some(parsed())), &mut session.draft);

        assert!(!applied);
        assert_eq!(session.draft, OrderDraft::default());
        assert_eq!(session.quick_fill.state(), &QuickFillState::Idle);
    }

    #[test]
    fn abandoned_request_frees_quick_fill() {
        let mut quick_fill = QuickFill::default();
        let ticket = quick_fill.begin("John wants cookies").expect("begin");

        assert!(quick_fill.abandon(ticket));
        assert_eq!(quick_fill.state(), &QuickFillState::Idle);
        assert!(!quick_fill.abandon(ticket));

        let next = quick_fill.begin("again").expect("begin after abandon");
        assert!(!quick_fill.abandon(ticket));
        assert_eq!(quick_fill.state(), &QuickFillState::Pending);
        assert!(quick_fill.abandon(next));
    }

    #[test]
    fn draft_round_trips_to_input() {
        let draft = OrderDraft {
            customer_name: "Alex".to_string(),
            items: "1x Soda".to_string(),
            total_price: "2.00".to_string(),
            ..OrderDraft::default()
        };

        let input = draft.to_input();

        assert_eq!(input.customer_name, "Alex");
        assert_eq!(input.total_price, Value::String("2.00".to_string()));
        assert_eq!(input.payment_status, PaymentStatus::Unpaid);
        assert_eq!(input.delivery_status, DeliveryStatus::Pending);
    }
}

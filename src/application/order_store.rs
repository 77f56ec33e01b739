use std::collections::HashSet;

use bigdecimal::{BigDecimal, Zero};
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{order_number_for, Order, OrderInput};
use crate::domain::ports::KeyValueStore;

use super::seed::seed_orders;

pub const ORDERS_KEY: &str = "fundraiser_orders_v2";

/// Authoritative in-memory order collection, mirrored to a [`KeyValueStore`]
/// after every mutation.
pub struct OrderStore<S> {
    storage: S,
    orders: Vec<Order>,
}

impl<S: KeyValueStore> OrderStore<S> {
    /// Load the persisted collection, falling back to the seed dataset when
    /// nothing usable is stored. Records are read one by one, so a damaged
    /// record costs only itself. The loaded collection is written back once.
    pub fn open(storage: S) -> Self {
        let orders = match storage.get(ORDERS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Value>>(&raw) {
                Ok(records) => dedupe_ids(read_records(records)),
                Err(e) => {
                    log::warn!("Stored orders are unreadable ({}), using seed data", e);
                    seed_orders(now_millis())
                }
            },
            Ok(None) => {
                log::info!("No stored orders found, using seed data");
                seed_orders(now_millis())
            }
            Err(e) => {
                log::warn!("Failed to read stored orders ({}), using seed data", e);
                seed_orders(now_millis())
            }
        };

        let store = Self { storage, orders };
        if let Err(e) = store.persist() {
            log::warn!("Failed to write orders at startup: {}", e);
        }
        store
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn get(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn create(&mut self, input: OrderInput) -> Result<Order, DomainError> {
        let mut order = Order {
            id: Uuid::new_v4().to_string(),
            order_number: order_number_for(self.orders.len() + 1),
            customer_name: String::new(),
            phone_number: String::new(),
            items: String::new(),
            total_price: BigDecimal::zero(),
            payment_status: input.payment_status,
            delivery_status: input.delivery_status,
            notes: String::new(),
            created_at: now_millis(),
        };
        order.apply_input(input);

        self.orders.insert(0, order.clone());
        log::info!("Created order {} ({})", order.order_number, order.id);
        self.persist()?;
        Ok(order)
    }

    pub fn update(&mut self, id: &str, input: OrderInput) -> Result<Option<Order>, DomainError> {
        self.mutate(id, |order| order.apply_input(input))
    }

    pub fn delete(&mut self, id: &str) -> Result<bool, DomainError> {
        let before = self.orders.len();
        self.orders.retain(|o| o.id != id);
        if self.orders.len() == before {
            return Ok(false);
        }
        log::info!("Deleted order {}", id);
        self.persist()?;
        Ok(true)
    }

    pub fn toggle_payment(&mut self, id: &str) -> Result<Option<Order>, DomainError> {
        self.mutate(id, |order| order.payment_status = order.payment_status.toggled())
    }

    pub fn toggle_delivery(&mut self, id: &str) -> Result<Option<Order>, DomainError> {
        self.mutate(id, |order| order.delivery_status = order.delivery_status.toggled())
    }

    fn mutate<F>(&mut self, id: &str, change: F) -> Result<Option<Order>, DomainError>
    where
        F: FnOnce(&mut Order),
    {
        let Some(order) = self.orders.iter_mut().find(|o| o.id == id) else {
            log::debug!("Ignoring change to unknown order {}", id);
            return Ok(None);
        };
        change(order);
        let updated = order.clone();
        log::info!("Updated order {} ({})", updated.order_number, updated.id);
        self.persist()?;
        Ok(Some(updated))
    }

    fn persist(&self) -> Result<(), DomainError> {
        let raw = serde_json::to_string(&self.orders)?;
        self.storage.set(ORDERS_KEY, &raw)
    }
}

fn read_records(records: Vec<Value>) -> Vec<Order> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(position, record)| match serde_json::from_value::<Order>(record) {
            Ok(order) => Some(order),
            Err(e) => {
                log::warn!("Skipping stored order at position {} ({})", position, e);
                None
            }
        })
        .collect()
}

fn dedupe_ids(orders: Vec<Order>) -> Vec<Order> {
    let mut seen = HashSet::new();
    let total = orders.len();
    let unique: Vec<Order> = orders
        .into_iter()
        .filter(|o| seen.insert(o.id.clone()))
        .collect();
    if unique.len() != total {
        log::warn!(
            "Dropped {} stored orders with duplicate ids",
            total - unique.len()
        );
    }
    unique
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

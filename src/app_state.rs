use std::sync::{Arc, Mutex, MutexGuard};

use crate::application::order_form::FormSession;
use crate::application::order_store::OrderStore;
use crate::domain::ports::{KeyValueStore, OrderExtractor};
use crate::errors::AppError;

pub type SharedStore = OrderStore<Box<dyn KeyValueStore>>;

/// State shared by every request handler.
pub struct AppState {
    store: Mutex<SharedStore>,
    form: Mutex<FormSession>,
    extractor: Arc<dyn OrderExtractor>,
}

impl AppState {
    pub fn new(storage: Box<dyn KeyValueStore>, extractor: Arc<dyn OrderExtractor>) -> Self {
        Self {
            store: Mutex::new(OrderStore::open(storage)),
            form: Mutex::new(FormSession::default()),
            extractor,
        }
    }

    pub fn store(&self) -> Result<MutexGuard<'_, SharedStore>, AppError> {
        self.store
            .lock()
            .map_err(|e| AppError::Internal(format!("order store lock poisoned: {}", e)))
    }

    pub fn form(&self) -> Result<MutexGuard<'_, FormSession>, AppError> {
        self.form
            .lock()
            .map_err(|e| AppError::Internal(format!("form lock poisoned: {}", e)))
    }

    pub fn extractor(&self) -> Arc<dyn OrderExtractor> {
        Arc::clone(&self.extractor)
    }
}

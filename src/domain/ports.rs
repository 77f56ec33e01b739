use async_trait::async_trait;

use super::errors::{DomainError, ExtractionError};
use super::extraction::ParsedOrder;

/// Durable key-value storage scoped to one application instance.
pub trait KeyValueStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError>;
    fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        (**self).set(key, value)
    }
}

/// Turns free text into order fields.
///
/// `Ok(None)` means the service answered with nothing; an `Err` means the
/// round trip itself failed.
#[async_trait]
pub trait OrderExtractor: Send + Sync + 'static {
    async fn extract(&self, text: &str) -> Result<Option<ParsedOrder>, ExtractionError>;
}

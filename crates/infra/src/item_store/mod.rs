//! Item store abstraction over the external document database.
//!
//! Every operation is a single store call. "Already exists" and "not found"
//! are ordinary error variants, so callers match on them instead of treating
//! them as unexpected failures.

pub mod cosmos;
pub mod in_memory;

use std::sync::Arc;

use async_trait::async_trait;
use catalog_core::ItemKey;
use catalog_products::Product;
use thiserror::Error;

pub use cosmos::CosmosItemStore;
pub use in_memory::InMemoryItemStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// `create_item` collided with an existing `(id, partition key)`.
    #[error("item {0} already exists")]
    AlreadyExists(ItemKey),

    /// The addressed item does not exist.
    #[error("item {0} not found")]
    NotFound(ItemKey),

    /// The store could not be reached (connect, TLS, timeout, ...).
    #[error("store request failed: {0}")]
    Transport(String),

    /// The store answered with an unexpected status.
    #[error("store returned status {status}: {message}")]
    Backend { status: u16, message: String },

    /// The store answered, but the payload could not be decoded.
    #[error("failed to decode store response: {0}")]
    Decode(String),
}

/// Document store keyed by `(id, partition key)`.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Insert a new item; fails with [`StoreError::AlreadyExists`] on collision.
    async fn create_item(&self, item: &Product) -> Result<(), StoreError>;

    /// Insert or fully replace an item. Never conflicts.
    async fn upsert_item(&self, item: &Product) -> Result<(), StoreError>;

    async fn read_item(&self, key: &ItemKey) -> Result<Product, StoreError>;

    async fn delete_item(&self, key: &ItemKey) -> Result<(), StoreError>;

    /// Every item across all partitions.
    async fn list_items(&self) -> Result<Vec<Product>, StoreError>;
}

#[async_trait]
impl<S> ItemStore for Arc<S>
where
    S: ItemStore + ?Sized,
{
    async fn create_item(&self, item: &Product) -> Result<(), StoreError> {
        (**self).create_item(item).await
    }

    async fn upsert_item(&self, item: &Product) -> Result<(), StoreError> {
        (**self).upsert_item(item).await
    }

    async fn read_item(&self, key: &ItemKey) -> Result<Product, StoreError> {
        (**self).read_item(key).await
    }

    async fn delete_item(&self, key: &ItemKey) -> Result<(), StoreError> {
        (**self).delete_item(key).await
    }

    async fn list_items(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list_items().await
    }
}

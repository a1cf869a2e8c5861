use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use catalog_core::ItemKey;
use catalog_products::Product;

use super::{ItemStore, StoreError};

/// In-memory item store for tests/dev.
///
/// Create checks for an existing key and inserts under a single write lock, so
/// concurrent creates of the same key yield exactly one success.
#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    inner: RwLock<BTreeMap<ItemKey, Product>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend {
        status: 500,
        message: "in-memory store lock poisoned".to_string(),
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn create_item(&self, item: &Product) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let key = item.key();
        if map.contains_key(&key) {
            return Err(StoreError::AlreadyExists(key));
        }
        map.insert(key, item.clone());
        Ok(())
    }

    async fn upsert_item(&self, item: &Product) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(item.key(), item.clone());
        Ok(())
    }

    async fn read_item(&self, key: &ItemKey) -> Result<Product, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        map.get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.clone()))
    }

    async fn delete_item(&self, key: &ItemKey) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(key.clone()))
    }

    async fn list_items(&self) -> Result<Vec<Product>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().cloned().collect())
    }
}

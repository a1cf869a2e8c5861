//! Product operation dispatch.
//!
//! Maps a validated [`ProductRequest`] onto exactly one [`ItemStore`] call and
//! reports the result as an [`Outcome`] or a [`DispatchError`]:
//!
//! ```text
//! ProductRequest          store call      Outcome / error
//! Create(product)    ->   create_item  -> Created | AlreadyExists
//! Update(product)    ->   upsert_item  -> Updated
//! ReadOne(key)       ->   read_item    -> Found   | NotFound
//! ReadAll            ->   list_items   -> Listed
//! Delete(key)        ->   delete_item  -> Deleted | NotFound
//! ```
//!
//! Any other store failure is carried through as `DispatchError::Store`. There
//! are no retries and no multi-call sequences, so conflicting writes are
//! settled by the store alone.

use catalog_core::ItemKey;
use catalog_products::{Product, ProductRequest};
use thiserror::Error;

use crate::item_store::{ItemStore, StoreError};

/// Successful result of a dispatched operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Created(Product),
    Updated(Product),
    Found(Product),
    Listed(Vec<Product>),
    Deleted(ItemKey),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    /// Create collided with an existing item.
    #[error("item {0} already exists")]
    AlreadyExists(ItemKey),
    /// Read-one or delete addressed an absent item.
    #[error("item {0} not found")]
    NotFound(ItemKey),
    /// Any other store failure (transport, status, decoding).
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for DispatchError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::AlreadyExists(key) => DispatchError::AlreadyExists(key),
            StoreError::NotFound(key) => DispatchError::NotFound(key),
            other => DispatchError::Store(other),
        }
    }
}

/// Executes validated product requests against an item store.
///
/// The store is injected once at construction and shared by every request;
/// the dispatcher itself holds no other state.
#[derive(Debug)]
pub struct ProductDispatcher<S> {
    store: S,
}

impl<S> ProductDispatcher<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> ProductDispatcher<S>
where
    S: ItemStore,
{
    pub async fn dispatch(&self, request: ProductRequest) -> Result<Outcome, DispatchError> {
        let operation = request.operation();
        let result = match request {
            ProductRequest::Create(product) => self
                .store
                .create_item(&product)
                .await
                .map(|()| Outcome::Created(product)),
            ProductRequest::Update(product) => self
                .store
                .upsert_item(&product)
                .await
                .map(|()| Outcome::Updated(product)),
            ProductRequest::ReadOne(key) => self.store.read_item(&key).await.map(Outcome::Found),
            ProductRequest::ReadAll => self.store.list_items().await.map(Outcome::Listed),
            ProductRequest::Delete(key) => self
                .store
                .delete_item(&key)
                .await
                .map(|()| Outcome::Deleted(key)),
        };

        match &result {
            Ok(outcome) => tracing::debug!(%operation, outcome = outcome.kind(), "dispatched"),
            Err(StoreError::AlreadyExists(key) | StoreError::NotFound(key)) => {
                tracing::info!(%operation, id = key.id(), category = key.partition_key(), "store rejected key");
            }
            Err(_) => {}
        }

        result.map_err(DispatchError::from)
    }
}

impl Outcome {
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Created(_) => "created",
            Outcome::Updated(_) => "updated",
            Outcome::Found(_) => "found",
            Outcome::Listed(_) => "listed",
            Outcome::Deleted(_) => "deleted",
        }
    }
}

use std::sync::Arc;

use catalog_infra::{
    command_dispatcher::ProductDispatcher,
    config::ConfigError,
    item_store::{CosmosItemStore, InMemoryItemStore, ItemStore},
};
use catalog_products::Strictness;

use crate::config::{ServiceConfig, StoreBackend};

/// Store handle shared by every request.
pub type SharedStore = Arc<dyn ItemStore>;

pub type Dispatcher = ProductDispatcher<SharedStore>;

/// Process-wide services, built once at startup.
#[derive(Clone)]
pub enum AppServices {
    Ready {
        dispatcher: Arc<Dispatcher>,
        strictness: Strictness,
    },
    /// The store could not be configured; product requests answer 500.
    Unconfigured { error: ConfigError },
}

impl AppServices {
    pub fn with_store(store: SharedStore, strictness: Strictness) -> Self {
        AppServices::Ready {
            dispatcher: Arc::new(ProductDispatcher::new(store)),
            strictness,
        }
    }

    pub fn in_memory(strictness: Strictness) -> Self {
        Self::with_store(Arc::new(InMemoryItemStore::new()), strictness)
    }

    pub fn unconfigured(error: ConfigError) -> Self {
        AppServices::Unconfigured { error }
    }

    pub fn build(config: &ServiceConfig) -> Self {
        match &config.backend {
            StoreBackend::Memory => {
                tracing::warn!("using in-memory product store; data is not persisted");
                Self::in_memory(config.strictness)
            }
            StoreBackend::Cosmos(settings) => {
                let store = settings
                    .as_ref()
                    .map_err(Clone::clone)
                    .and_then(CosmosItemStore::new);
                match store {
                    Ok(store) => {
                        tracing::info!(
                            store = ?store,
                            strictness = config.strictness.as_str(),
                            "product store ready"
                        );
                        Self::with_store(Arc::new(store), config.strictness)
                    }
                    Err(error) => {
                        tracing::error!(%error, "product store not configured; product requests will fail");
                        Self::unconfigured(error)
                    }
                }
            }
        }
    }

    /// The dispatcher and validation strictness, or the configuration error
    /// that prevents serving product requests.
    pub fn ready(&self) -> Result<(&Dispatcher, Strictness), &ConfigError> {
        match self {
            AppServices::Ready {
                dispatcher,
                strictness,
            } => Ok((dispatcher.as_ref(), *strictness)),
            AppServices::Unconfigured { error } => Err(error),
        }
    }
}

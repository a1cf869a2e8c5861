//! Service configuration from environment variables.

use catalog_infra::config::{ConfigError, StoreConfig};
use catalog_products::Strictness;

pub const ENV_BIND_ADDR: &str = "CATALOG_BIND_ADDR";
pub const ENV_STORE: &str = "PRODUCTS_STORE";
pub const ENV_VALIDATION: &str = "PRODUCTS_VALIDATION";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Which item store backs the service.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    /// Cosmos DB; the settings may be incomplete, which is reported per request.
    Cosmos(Result<StoreConfig, ConfigError>),
    /// Process-local store (dev/test); nothing is persisted.
    Memory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub bind_addr: String,
    pub backend: StoreBackend,
    pub strictness: Strictness,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary lookup. Never fails: unknown values fall back
    /// to defaults with a warning, and missing store settings are kept as an
    /// error for the HTTP layer to report.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup(ENV_BIND_ADDR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let strictness = match lookup(ENV_VALIDATION) {
            None => Strictness::default(),
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "{ENV_VALIDATION} not understood; using lenient validation");
                Strictness::default()
            }),
        };

        let backend = match lookup(ENV_STORE).as_deref().map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("memory") => StoreBackend::Memory,
            Some(v) if !v.is_empty() && !v.eq_ignore_ascii_case("cosmos") => {
                tracing::warn!(value = v, "{ENV_STORE} not understood; using cosmos");
                StoreBackend::Cosmos(StoreConfig::from_lookup(&lookup))
            }
            _ => StoreBackend::Cosmos(StoreConfig::from_lookup(&lookup)),
        };

        Self {
            bind_addr,
            backend,
            strictness,
        }
    }
}

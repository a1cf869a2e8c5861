//! Store configuration loading.
//!
//! The Cosmos DB connection is described by four environment values. All of
//! them are required; a missing value is reported as a [`ConfigError`] rather
//! than aborting the process, so the HTTP layer can answer with a 500.

use thiserror::Error;

pub const ENV_COSMOS_URL: &str = "COSMOS_URL";
pub const ENV_COSMOS_KEY: &str = "COSMOS_KEY";
pub const ENV_DATABASE_NAME: &str = "DATABASE_NAME";
pub const ENV_CONTAINER_NAME: &str = "COSMOS_CONTAINER_NAME";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more required environment values are absent or blank.
    #[error("Missing Cosmos DB environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    /// The account key is not valid base64.
    #[error("invalid Cosmos DB account key: {0}")]
    InvalidKey(String),

    /// The endpoint is not an absolute http(s) URL.
    #[error("invalid Cosmos DB endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Connection settings for the document store.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub endpoint: String,
    pub key: String,
    pub database: String,
    pub container: String,
}

impl core::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("endpoint", &self.endpoint)
            .field("key", &"<redacted>")
            .field("database", &self.database)
            .field("container", &self.container)
            .finish()
    }
}

impl StoreConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary key/value lookup (tests, alternate sources).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut read = |name: &'static str| {
            let value = lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
            if value.is_none() {
                missing.push(name);
            }
            value.unwrap_or_default()
        };

        let endpoint = read(ENV_COSMOS_URL);
        let key = read(ENV_COSMOS_KEY);
        let database = read(ENV_DATABASE_NAME);
        let container = read(ENV_CONTAINER_NAME);

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        Ok(Self {
            endpoint,
            key,
            database,
            container,
        })
    }
}

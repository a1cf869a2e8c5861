//! Azure Cosmos DB (SQL API) item store over the REST interface.
//!
//! Requests are signed with the account master key:
//!
//! ```text
//! sig  = base64(HMAC-SHA256(base64_decode(key),
//!            lower(verb) \n lower(resourceType) \n resourceLink \n lower(date) \n \n))
//! auth = urlencode("type=master&ver=1.0&sig=" + sig)
//! ```
//!
//! Items live under `dbs/{db}/colls/{coll}/docs` and are addressed by id plus
//! the `x-ms-documentdb-partitionkey` header.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use catalog_core::ItemKey;
use catalog_products::Product;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use sha2::Sha256;

use super::{ItemStore, StoreError};
use crate::config::{ConfigError, StoreConfig};

type HmacSha256 = Hmac<Sha256>;

pub const API_VERSION: &str = "2018-12-31";
const RESOURCE_TYPE_DOCS: &str = "docs";
const PAGE_SIZE: &str = "100";

const HEADER_DATE: &str = "x-ms-date";
const HEADER_VERSION: &str = "x-ms-version";
const HEADER_PARTITION_KEY: &str = "x-ms-documentdb-partitionkey";
const HEADER_IS_UPSERT: &str = "x-ms-documentdb-is-upsert";
const HEADER_CONTINUATION: &str = "x-ms-continuation";
const HEADER_MAX_ITEM_COUNT: &str = "x-ms-max-item-count";
const HEADER_CROSS_PARTITION: &str = "x-ms-documentdb-query-enablecrosspartition";

/// Cosmos DB REST client bound to one container.
pub struct CosmosItemStore {
    http: reqwest::Client,
    signer: HmacSha256,
    /// `.../dbs/{db}/colls/{coll}/docs`
    docs_url: Url,
    /// `dbs/{db}/colls/{coll}` (unencoded, as signed).
    collection_link: String,
}

impl core::fmt::Debug for CosmosItemStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CosmosItemStore")
            .field("docs_url", &self.docs_url.as_str())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct DocumentFeed {
    #[serde(rename = "Documents", default)]
    documents: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct CosmosErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl CosmosItemStore {
    pub fn new(config: &StoreConfig) -> Result<Self, ConfigError> {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: &StoreConfig, http: reqwest::Client) -> Result<Self, ConfigError> {
        let key = BASE64
            .decode(config.key.as_bytes())
            .map_err(|e| ConfigError::InvalidKey(e.to_string()))?;
        let signer =
            HmacSha256::new_from_slice(&key).map_err(|e| ConfigError::InvalidKey(e.to_string()))?;

        let mut docs_url = Url::parse(&config.endpoint)
            .map_err(|e| ConfigError::InvalidEndpoint(format!("{}: {e}", config.endpoint)))?;
        if !matches!(docs_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint(config.endpoint.clone()));
        }
        docs_url
            .path_segments_mut()
            .map_err(|_| ConfigError::InvalidEndpoint(config.endpoint.clone()))?
            .pop_if_empty()
            .extend(["dbs", config.database.as_str(), "colls", config.container.as_str(), "docs"]);

        Ok(Self {
            http,
            signer,
            docs_url,
            collection_link: format!("dbs/{}/colls/{}", config.database, config.container),
        })
    }

    fn document_url(&self, id: &str) -> Url {
        let mut url = self.docs_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url
    }

    fn document_link(&self, id: &str) -> String {
        format!("{}/docs/{id}", self.collection_link)
    }

    fn authorization(&self, verb: &Method, resource_link: &str, date: &str) -> String {
        let payload = string_to_sign(verb.as_str(), RESOURCE_TYPE_DOCS, resource_link, date);
        let mut mac = self.signer.clone();
        mac.update(payload.as_bytes());
        let sig = BASE64.encode(mac.finalize().into_bytes());
        urlencoding::encode(&format!("type=master&ver=1.0&sig={sig}")).into_owned()
    }

    /// Signed request builder. `resource_link` is what gets signed.
    fn request(
        &self,
        method: Method,
        url: Url,
        resource_link: &str,
        partition_key: Option<&str>,
    ) -> RequestBuilder {
        let date = rfc1123_now();
        let auth = self.authorization(&method, resource_link, &date);
        let mut builder = self
            .http
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(HEADER_DATE, date)
            .header(HEADER_VERSION, API_VERSION);
        if let Some(pk) = partition_key {
            builder = builder.header(HEADER_PARTITION_KEY, partition_key_header(pk));
        }
        builder
    }

    async fn write(&self, item: &Product, upsert: bool) -> Result<Response, StoreError> {
        let mut builder = self.request(
            Method::POST,
            self.docs_url.clone(),
            &self.collection_link,
            Some(item.category()),
        );
        if upsert {
            builder = builder.header(HEADER_IS_UPSERT, "True");
        }
        builder.json(item).send().await.map_err(transport)
    }
}

#[async_trait]
impl ItemStore for CosmosItemStore {
    async fn create_item(&self, item: &Product) -> Result<(), StoreError> {
        let response = self.write(item, false).await?;
        match response.status() {
            StatusCode::CREATED | StatusCode::OK => Ok(()),
            StatusCode::CONFLICT => Err(StoreError::AlreadyExists(item.key())),
            _ => Err(backend_error(response).await),
        }
    }

    async fn upsert_item(&self, item: &Product) -> Result<(), StoreError> {
        let response = self.write(item, true).await?;
        match response.status() {
            StatusCode::CREATED | StatusCode::OK => Ok(()),
            _ => Err(backend_error(response).await),
        }
    }

    async fn read_item(&self, key: &ItemKey) -> Result<Product, StoreError> {
        let response = self
            .request(
                Method::GET,
                self.document_url(key.id()),
                &self.document_link(key.id()),
                Some(key.partition_key()),
            )
            .send()
            .await
            .map_err(transport)?;

        match response.status() {
            StatusCode::OK => response.json::<Product>().await.map_err(decode),
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(key.clone())),
            _ => Err(backend_error(response).await),
        }
    }

    async fn delete_item(&self, key: &ItemKey) -> Result<(), StoreError> {
        let response = self
            .request(
                Method::DELETE,
                self.document_url(key.id()),
                &self.document_link(key.id()),
                Some(key.partition_key()),
            )
            .send()
            .await
            .map_err(transport)?;

        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(key.clone())),
            _ => Err(backend_error(response).await),
        }
    }

    async fn list_items(&self) -> Result<Vec<Product>, StoreError> {
        let mut items = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut builder = self
                .request(Method::GET, self.docs_url.clone(), &self.collection_link, None)
                .header(HEADER_MAX_ITEM_COUNT, PAGE_SIZE)
                .header(HEADER_CROSS_PARTITION, "True");
            if let Some(token) = &continuation {
                builder = builder.header(HEADER_CONTINUATION, token.as_str());
            }

            let response = builder.send().await.map_err(transport)?;
            if !response.status().is_success() {
                return Err(backend_error(response).await);
            }

            continuation = response
                .headers()
                .get(HEADER_CONTINUATION)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_string);

            let page: DocumentFeed = response.json().await.map_err(decode)?;
            tracing::debug!(page_items = page.documents.len(), more = continuation.is_some(), "read feed page");
            items.extend(page.documents);

            if continuation.is_none() {
                break;
            }
        }

        Ok(items)
    }
}

/// Canonical payload signed for master-key auth.
pub fn string_to_sign(verb: &str, resource_type: &str, resource_link: &str, date: &str) -> String {
    format!(
        "{}\n{}\n{}\n{}\n\n",
        verb.to_lowercase(),
        resource_type.to_lowercase(),
        resource_link,
        date.to_lowercase()
    )
}

/// JSON array header value with non-ASCII escaped (header values must be ASCII).
pub fn partition_key_header(partition_key: &str) -> String {
    let json = serde_json::Value::Array(vec![serde_json::Value::String(partition_key.to_string())])
        .to_string();
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}

fn rfc1123_now() -> String {
    Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn transport(err: reqwest::Error) -> StoreError {
    StoreError::Transport(err.to_string())
}

fn decode(err: reqwest::Error) -> StoreError {
    StoreError::Decode(err.to_string())
}

async fn backend_error(response: Response) -> StoreError {
    let status = response.status();
    let message = response
        .json::<CosmosErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unexpected status").to_string());
    StoreError::Backend {
        status: status.as_u16(),
        message,
    }
}

use catalog_core::ItemKey;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// A catalog product, addressed by `(id, Category)`.
///
/// The wire and storage shape is
/// `{"id": "...", "Category": "...", "name": "...", "price": 0.0}`.
/// Decoding tolerates stored documents that predate normalization: unknown
/// properties are ignored and `name`/`price` go through the same coercion the
/// request validator applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(default, deserialize_with = "deserialize_name")]
    name: String,
    #[serde(default, deserialize_with = "deserialize_price")]
    price: f64,
}

impl Product {
    /// Build a product from already-normalized parts.
    ///
    /// Callers are expected to pass a non-blank `id` and `category`; the request
    /// validator is the only production caller and guarantees this.
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        name: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            name: name.into(),
            price,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Partition key.
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.id.clone(), self.category.clone())
    }
}

/// Coerce a raw JSON value into a price.
///
/// Numbers are taken as-is, numeric strings are parsed, everything else
/// (including NaN/infinity, which JSON cannot carry back out) becomes `0.0`.
pub fn coerce_price(value: &JsonValue) -> f64 {
    let parsed = match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|p| p.is_finite()).unwrap_or(0.0)
}

/// Coerce a raw JSON value into a display name (trimmed; `""` when unusable).
pub fn coerce_name(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn deserialize_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = JsonValue::deserialize(deserializer)?;
    Ok(coerce_name(&raw))
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = JsonValue::deserialize(deserializer)?;
    Ok(coerce_price(&raw))
}

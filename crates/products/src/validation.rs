//! Request validation: raw HTTP input -> validated product operation.
//!
//! Write operations (create/update) take a JSON body; read/delete take the
//! `id` and `Category` query parameters. Field names are matched exactly
//! (case-sensitive). Validation never touches the store, so a rejected request
//! costs zero store calls.

use core::str::FromStr;

use catalog_core::{ItemKey, ValidationError, ValidationResult};
use serde_json::{Map, Value as JsonValue};

use crate::product::{Product, coerce_name, coerce_price};

pub const FIELD_ID: &str = "id";
pub const FIELD_NAME: &str = "name";
pub const FIELD_CATEGORY: &str = "Category";
pub const FIELD_PRICE: &str = "price";

/// Characters Cosmos DB refuses in a document id.
pub const FORBIDDEN_ID_CHARS: [char; 4] = ['/', '\\', '?', '#'];

/// How many body fields a write must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Only `id` and `Category` are required; `name`/`price` default.
    #[default]
    Lenient,
    /// `id`, `name`, `Category` and `price` are all required.
    Strict,
}

impl Strictness {
    /// Required body fields, in the order they are reported when missing.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Strictness::Lenient => &[FIELD_ID, FIELD_CATEGORY],
            Strictness::Strict => &[FIELD_ID, FIELD_NAME, FIELD_CATEGORY, FIELD_PRICE],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strictness::Lenient => "lenient",
            Strictness::Strict => "strict",
        }
    }
}

impl FromStr for Strictness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(Strictness::Lenient),
            "strict" => Ok(Strictness::Strict),
            other => Err(format!("unknown validation strictness: {other}")),
        }
    }
}

/// The four product operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// Query parameters addressing a single product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyParams {
    pub id: Option<String>,
    pub category: Option<String>,
}

impl KeyParams {
    pub fn new(id: Option<&str>, category: Option<&str>) -> Self {
        Self {
            id: id.map(str::to_string),
            category: category.map(str::to_string),
        }
    }

    /// Collect `id`/`Category` from decoded query pairs. A repeated key keeps
    /// its first value; unrelated keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (name, value) in pairs {
            let slot = match name.as_ref() {
                FIELD_ID => &mut params.id,
                FIELD_CATEGORY => &mut params.category,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }

    /// The addressed key, if both components are present and non-blank.
    pub fn key(&self) -> Option<ItemKey> {
        match (non_blank(self.id.as_deref()), non_blank(self.category.as_deref())) {
            (Some(id), Some(category)) => Some(ItemKey::new(id, category)),
            _ => None,
        }
    }

    fn require_key(&self) -> ValidationResult<ItemKey> {
        let id = non_blank(self.id.as_deref());
        let category = non_blank(self.category.as_deref());
        match (id, category) {
            (Some(id), Some(category)) => {
                check_id(id)?;
                Ok(ItemKey::new(id, category))
            }
            (id, category) => {
                let mut missing = Vec::new();
                if id.is_none() {
                    missing.push(FIELD_ID);
                }
                if category.is_none() {
                    missing.push(FIELD_CATEGORY);
                }
                Err(ValidationError::missing(missing))
            }
        }
    }
}

/// Raw, unvalidated request input.
#[derive(Debug, Clone, Copy)]
pub enum RawInput<'a> {
    /// Request body bytes (create/update).
    Body(&'a [u8]),
    /// Query parameters (read/delete).
    Params(&'a KeyParams),
}

/// A validated operation, ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductRequest {
    Create(Product),
    Update(Product),
    ReadOne(ItemKey),
    ReadAll,
    Delete(ItemKey),
}

impl ProductRequest {
    pub fn operation(&self) -> Operation {
        match self {
            ProductRequest::Create(_) => Operation::Create,
            ProductRequest::Update(_) => Operation::Update,
            ProductRequest::ReadOne(_) | ProductRequest::ReadAll => Operation::Read,
            ProductRequest::Delete(_) => Operation::Delete,
        }
    }
}

/// Validate raw input for `operation`.
///
/// - Create/Update expect [`RawInput::Body`] and produce a normalized
///   [`Product`] (`name` trimmed or `""`, `price` coerced or `0.0`).
/// - Read expects [`RawInput::Params`]; both keys present selects a single
///   item, anything else lists all items.
/// - Delete expects [`RawInput::Params`] with both keys present.
pub fn validate(
    operation: Operation,
    input: RawInput<'_>,
    strictness: Strictness,
) -> ValidationResult<ProductRequest> {
    match (operation, input) {
        (Operation::Create, RawInput::Body(body)) => {
            parse_product(body, strictness).map(ProductRequest::Create)
        }
        (Operation::Update, RawInput::Body(body)) => {
            parse_product(body, strictness).map(ProductRequest::Update)
        }
        (Operation::Read, RawInput::Params(params)) => match params.key() {
            Some(key) => {
                check_id(key.id())?;
                Ok(ProductRequest::ReadOne(key))
            }
            None => Ok(ProductRequest::ReadAll),
        },
        (Operation::Delete, RawInput::Params(params)) => {
            params.require_key().map(ProductRequest::Delete)
        }
        (op, _) => Err(ValidationError::malformed(format!(
            "unexpected input for {op} operation"
        ))),
    }
}

fn parse_product(body: &[u8], strictness: Strictness) -> ValidationResult<Product> {
    let value: JsonValue =
        serde_json::from_slice(body).map_err(|_| ValidationError::malformed("Invalid JSON"))?;
    let JsonValue::Object(fields) = value else {
        return Err(ValidationError::malformed(
            "Request body must be a JSON object",
        ));
    };

    let id = key_component(&fields, FIELD_ID);
    let category = key_component(&fields, FIELD_CATEGORY);

    let missing: Vec<&'static str> = strictness
        .required_fields()
        .iter()
        .copied()
        .filter(|field| match *field {
            FIELD_ID => id.is_none(),
            FIELD_CATEGORY => category.is_none(),
            other => fields.get(other).is_none_or(JsonValue::is_null),
        })
        .collect();

    match (id, category) {
        (Some(id), Some(category)) if missing.is_empty() => {
            check_id(&id)?;
            let name = fields.get(FIELD_NAME).map(coerce_name).unwrap_or_default();
            let price = fields.get(FIELD_PRICE).map(coerce_price).unwrap_or(0.0);
            Ok(Product::new(id, category, name, price))
        }
        _ => Err(ValidationError::missing(missing)),
    }
}

/// A key component is a non-blank string or a number (stringified).
fn key_component(fields: &Map<String, JsonValue>, name: &str) -> Option<String> {
    match fields.get(name)? {
        JsonValue::String(s) => non_blank(Some(s.as_str())).map(str::to_string),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn check_id(id: &str) -> ValidationResult<()> {
    if id.contains(FORBIDDEN_ID_CHARS) {
        return Err(ValidationError::malformed(
            "Product id must not contain '/', '\\', '?' or '#'",
        ));
    }
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn create_with_all_fields_produces_product() {
        let raw = body(json!({"id": "p1", "Category": "tools", "name": "Hammer", "price": 9.99}));
        let req = validate(Operation::Create, RawInput::Body(&raw), Strictness::Lenient).unwrap();
        assert_eq!(
            req,
            ProductRequest::Create(Product::new("p1", "tools", "Hammer", 9.99))
        );
    }

    #[test]
    fn lenient_write_applies_defaults() {
        let raw = body(json!({"id": " p1 ", "Category": "tools"}));
        let req = validate(Operation::Update, RawInput::Body(&raw), Strictness::Lenient).unwrap();
        assert_eq!(req, ProductRequest::Update(Product::new("p1", "tools", "", 0.0)));
    }

    #[test]
    fn strict_write_requires_all_four_fields() {
        let raw = body(json!({"id": "p1", "Category": "tools"}));
        let err = validate(Operation::Create, RawInput::Body(&raw), Strictness::Strict).unwrap_err();
        assert_eq!(err, ValidationError::missing(vec!["name", "price"]));
        assert_eq!(err.to_string(), "Missing fields: name, price");
    }

    #[test]
    fn missing_fields_are_listed_in_canonical_order() {
        let raw = body(json!({"price": 1}));
        let err = validate(Operation::Create, RawInput::Body(&raw), Strictness::Strict).unwrap_err();
        assert_eq!(err.missing_fields(), &["id", "name", "Category"]);
    }

    #[test]
    fn blank_or_null_key_components_count_as_missing() {
        let raw = body(json!({"id": "   ", "Category": null}));
        let err = validate(Operation::Create, RawInput::Body(&raw), Strictness::Lenient).unwrap_err();
        assert_eq!(err.missing_fields(), &["id", "Category"]);
    }

    #[test]
    fn key_names_are_case_sensitive() {
        let raw = body(json!({"id": "p1", "category": "tools"}));
        let err = validate(Operation::Create, RawInput::Body(&raw), Strictness::Lenient).unwrap_err();
        assert_eq!(err.missing_fields(), &["Category"]);
    }

    #[test]
    fn numeric_id_is_stringified() {
        let raw = body(json!({"id": 42, "Category": "tools", "price": "3.5"}));
        let req = validate(Operation::Create, RawInput::Body(&raw), Strictness::Lenient).unwrap();
        assert_eq!(req, ProductRequest::Create(Product::new("42", "tools", "", 3.5)));
    }

    #[test]
    fn non_numeric_price_defaults_to_zero() {
        let raw = body(json!({"id": "p1", "Category": "tools", "name": "x", "price": "cheap"}));
        let req = validate(Operation::Create, RawInput::Body(&raw), Strictness::Strict).unwrap();
        assert_eq!(req, ProductRequest::Create(Product::new("p1", "tools", "x", 0.0)));
    }

    #[test]
    fn unparseable_body_is_malformed() {
        for raw in [&b""[..], &b"{not json"[..]] {
            let err = validate(Operation::Create, RawInput::Body(raw), Strictness::Lenient).unwrap_err();
            assert_eq!(err, ValidationError::malformed("Invalid JSON"));
        }
    }

    #[test]
    fn non_object_body_is_malformed() {
        let raw = body(json!(["id", "Category"]));
        let err = validate(Operation::Update, RawInput::Body(&raw), Strictness::Lenient).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedBody(_)));
    }

    #[test]
    fn read_with_both_params_targets_one_item() {
        let params = KeyParams::new(Some("p1"), Some("tools"));
        let req = validate(Operation::Read, RawInput::Params(&params), Strictness::Lenient).unwrap();
        assert_eq!(req, ProductRequest::ReadOne(ItemKey::new("p1", "tools")));
    }

    #[test]
    fn read_without_full_key_lists_everything() {
        for params in [
            KeyParams::default(),
            KeyParams::new(Some("p1"), None),
            KeyParams::new(None, Some("tools")),
            KeyParams::new(Some(""), Some("tools")),
        ] {
            let req = validate(Operation::Read, RawInput::Params(&params), Strictness::Strict).unwrap();
            assert_eq!(req, ProductRequest::ReadAll);
        }
    }

    #[test]
    fn delete_requires_both_params() {
        let params = KeyParams::new(None, Some("tools"));
        let err = validate(Operation::Delete, RawInput::Params(&params), Strictness::Lenient).unwrap_err();
        assert_eq!(err, ValidationError::missing(vec!["id"]));

        let params = KeyParams::default();
        let err = validate(Operation::Delete, RawInput::Params(&params), Strictness::Lenient).unwrap_err();
        assert_eq!(err.to_string(), "Missing fields: id, Category");

        let params = KeyParams::new(Some("p1"), Some("tools"));
        let req = validate(Operation::Delete, RawInput::Params(&params), Strictness::Lenient).unwrap();
        assert_eq!(req, ProductRequest::Delete(ItemKey::new("p1", "tools")));
        assert_eq!(req.operation(), Operation::Delete);
    }

    #[test]
    fn mismatched_input_is_rejected() {
        let params = KeyParams::default();
        let err = validate(Operation::Create, RawInput::Params(&params), Strictness::Lenient).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedBody(_)));
    }

    #[test]
    fn repeated_query_keys_keep_the_first_value() {
        let params = KeyParams::from_pairs([
            ("id", "p1"),
            ("Category", "tools"),
            ("Category", "garden"),
            ("id", "p2"),
            ("sort", "asc"),
        ]);
        assert_eq!(params, KeyParams::new(Some("p1"), Some("tools")));

        let req = validate(Operation::Delete, RawInput::Params(&params), Strictness::Lenient).unwrap();
        assert_eq!(req, ProductRequest::Delete(ItemKey::new("p1", "tools")));
    }

    #[test]
    fn ids_with_path_characters_are_rejected() {
        for id in ["a/b", "a\\b", "a?b", "a#b"] {
            let raw = body(json!({"id": id, "Category": "tools"}));
            let err = validate(Operation::Create, RawInput::Body(&raw), Strictness::Lenient).unwrap_err();
            assert!(matches!(err, ValidationError::MalformedBody(_)), "{id}");

            let params = KeyParams::new(Some(id), Some("tools"));
            for op in [Operation::Read, Operation::Delete] {
                let err = validate(op, RawInput::Params(&params), Strictness::Lenient).unwrap_err();
                assert_eq!(
                    err.to_string(),
                    "Product id must not contain '/', '\\', '?' or '#'"
                );
            }
        }

        // Only the id is addressed by path; the category travels in a header.
        let params = KeyParams::new(Some("p1"), Some("home/garden"));
        assert!(validate(Operation::Delete, RawInput::Params(&params), Strictness::Lenient).is_ok());
    }

    #[test]
    fn strictness_parses_case_insensitively() {
        assert_eq!("STRICT".parse::<Strictness>().unwrap(), Strictness::Strict);
        assert_eq!(" lenient ".parse::<Strictness>().unwrap(), Strictness::Lenient);
        assert!("loose".parse::<Strictness>().is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: a valid write round-trips its fields into the product.
            #[test]
            fn valid_write_preserves_fields(
                id in "[A-Za-z0-9-]{1,24}",
                category in "[A-Za-z][A-Za-z ]{0,15}[A-Za-z]",
                name in "[A-Za-z0-9 ]{0,40}",
                cents in 0u32..1_000_000,
            ) {
                let price = f64::from(cents);
                let raw = body(json!({"id": id, "Category": category, "name": name, "price": cents}));
                let req = validate(Operation::Create, RawInput::Body(&raw), Strictness::Strict).unwrap();
                let expected = Product::new(id.clone(), category.clone(), name.trim(), price);
                prop_assert_eq!(req, ProductRequest::Create(expected));
            }

            /// Property: the error lists exactly the absent required fields.
            #[test]
            fn missing_fields_are_exact(mask in proptest::collection::vec(any::<bool>(), 4), strict in any::<bool>()) {
                let strictness = if strict { Strictness::Strict } else { Strictness::Lenient };
                let all = [FIELD_ID, FIELD_NAME, FIELD_CATEGORY, FIELD_PRICE];
                let mut fields = Map::new();
                for (field, present) in all.iter().zip(&mask) {
                    if *present {
                        fields.insert(field.to_string(), json!("v1"));
                    }
                }
                let raw = serde_json::to_vec(&JsonValue::Object(fields)).unwrap();
                let expected: Vec<&str> = strictness
                    .required_fields()
                    .iter()
                    .copied()
                    .filter(|f| !mask[all.iter().position(|a| a == f).unwrap()])
                    .collect();

                let result = validate(Operation::Update, RawInput::Body(&raw), strictness);
                if expected.is_empty() {
                    prop_assert!(result.is_ok());
                } else {
                    prop_assert_eq!(result.unwrap_err(), ValidationError::missing(expected));
                }
            }
        }
    }
}

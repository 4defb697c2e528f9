//! Retail API wire types.
//!
//! Request and response bodies use the REST (camelCase) field names. Products
//! are converted to snake_case [`ProductMapping`]s for tool output.

use serde::Deserialize;
use serde_json::{Map, Value};
use vertex_retail_core::{ProductMapping, SearchResultReference};

/// Response of `servingConfigs.search`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Matches in ranking order. Absent when nothing matched.
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub total_size: i64,
    #[serde(default)]
    pub attribution_token: Option<String>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// One search match.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub id: String,
    pub product: ResultProduct,
}

/// The product stub embedded in a search match.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultProduct {
    pub name: String,
}

impl SearchResponse {
    /// Result references, in the order the service ranked them.
    #[must_use]
    pub fn into_references(self) -> Vec<SearchResultReference> {
        self.results
            .into_iter()
            .map(|result| SearchResultReference {
                id: result.id,
                name: result.product.name,
            })
            .collect()
    }
}

/// A full product record from `products.get`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub uri: String,
    /// Pricing object exactly as returned (`price`, `currencyCode`, `priceRange`, ...).
    #[serde(default)]
    pub price_info: Option<Map<String, Value>>,
    /// Every other field of the record, keyed by its REST name.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Fields whose object keys are caller-defined names rather than field names.
const USER_KEYED_FIELDS: &[&str] = &["attributes"];

impl Product {
    /// Convert to a plain mapping.
    ///
    /// Every field is kept, with snake_case keys at all depths. The price and
    /// currency are also lifted to top-level `price` / `currency_code`.
    #[must_use]
    pub fn into_mapping(self) -> ProductMapping {
        let mut mapping = ProductMapping::new();
        mapping.insert("id", Value::String(self.id));
        mapping.insert("name", Value::String(self.name));
        mapping.insert("title", Value::String(self.title));
        mapping.insert("uri", Value::String(self.uri));

        if let Some(price_info) = self.price_info {
            if let Some(price) = price_info.get("price").filter(|v| v.is_number()) {
                mapping.insert("price", price.clone());
            }
            if let Some(currency) = price_info
                .get("currencyCode")
                .and_then(Value::as_str)
                .filter(|c| !c.is_empty())
            {
                mapping.insert("currency_code", Value::String(currency.to_owned()));
            }
            mapping.insert("price_info", Value::Object(snake_case_fields(price_info)));
        }

        for (key, value) in snake_case_fields(self.fields) {
            mapping.insert(key, value);
        }

        mapping
    }
}

fn snake_case_fields(fields: Map<String, Value>) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(key, value)| {
            let key = snake_case(&key);
            let value = if USER_KEYED_FIELDS.contains(&key.as_str()) {
                snake_case_entry_values(value)
            } else {
                snake_case_value(value)
            };
            (key, value)
        })
        .collect()
}

fn snake_case_value(value: Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(snake_case_fields(fields)),
        Value::Array(items) => Value::Array(items.into_iter().map(snake_case_value).collect()),
        other => other,
    }
}

/// Keep the map's own keys, convert the values.
fn snake_case_entry_values(value: Value) -> Value {
    match value {
        Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key, snake_case_value(value)))
                .collect(),
        ),
        other => snake_case_value(other),
    }
}

/// `colorInfo` -> `color_info`.
fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

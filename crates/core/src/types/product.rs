//! Plain key/value product output.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A product record flattened into a plain JSON object.
///
/// Always carries `id`, `title`, `price` and `uri` when the source record had
/// them, alongside any further product attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductMapping(Map<String, Value>);

impl ProductMapping {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Insert a field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Product id.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.get("id").and_then(Value::as_str)
    }

    /// Product title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.get("title").and_then(Value::as_str)
    }

    /// Product price.
    #[must_use]
    pub fn price(&self) -> Option<f64> {
        self.get("price").and_then(Value::as_f64)
    }

    /// Canonical product URI.
    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        self.get("uri").and_then(Value::as_str)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the mapping has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for ProductMapping {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<ProductMapping> for Value {
    fn from(mapping: ProductMapping) -> Self {
        Self::Object(mapping.0)
    }
}

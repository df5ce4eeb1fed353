//! Insertion-ordered form payload for private calls
//!
//! The signature covers the payload serialized in insertion order, so the
//! order in which fields are added is part of the wire contract.

use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;

use crate::error::{AuthError, AuthResult};

/// Ordered mapping from field name to its wire value
///
/// Re-inserting an existing key replaces the value but keeps the key's
/// original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Payload {
    fields: Vec<(String, String)>,
}

impl Payload {
    /// Create an empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a payload whose first field is `method`
    pub fn with_method(method: impl Into<String>) -> Self {
        let mut payload = Self::new();
        payload.insert("method", method.into());
        payload
    }

    /// Insert or replace a field
    pub fn insert(&mut self, key: impl Into<String>, value: impl Display) -> &mut Self {
        let key = key.into();
        let value = value.to_string();

        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
        self
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn field(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a field only when a value is present
    pub fn insert_opt<V: Display>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    /// Look up a field value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The remote method identifier, if set
    pub fn method(&self) -> Option<&str> {
        self.get("method")
    }

    /// Whether the caller already supplied a usable nonce
    ///
    /// Empty and zero values count as absent.
    pub fn has_nonce(&self) -> bool {
        matches!(self.get("nonce"), Some(n) if !n.is_empty() && n != "0")
    }

    /// Iterate over fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialize as `key1=value1&key2=value2`, without URL-encoding
    ///
    /// This is the exact string the server recomputes the HMAC over.
    pub fn to_query_string(&self) -> String {
        self.fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl TryFrom<Value> for Payload {
    type Error = AuthError;

    /// Build a payload from a JSON object, keeping its key order
    ///
    /// Fails with [`AuthError::InvalidArgument`] for `null`, non-objects and
    /// values that have no flat form representation.
    fn try_from(value: Value) -> AuthResult<Self> {
        let object = match value {
            Value::Null => {
                return Err(AuthError::InvalidArgument(
                    "payload must be filled".to_string(),
                ))
            }
            Value::Object(object) => object,
            other => {
                return Err(AuthError::InvalidArgument(format!(
                    "payload must be an object, got {}",
                    json_kind(&other)
                )))
            }
        };

        let mut payload = Self::new();
        for (key, value) in object {
            let rendered = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(AuthError::InvalidArgument(format!(
                        "payload field `{}` must be a string or number, got {}",
                        key,
                        json_kind(&other)
                    )))
                }
            };
            payload.insert(key, rendered);
        }

        Ok(payload)
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for Payload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut payload = Self::new();
        for (key, value) in iter {
            payload.insert(key, value);
        }
        payload
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

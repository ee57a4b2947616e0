//! Response envelope normalization.
//!
//! The live API wraps payloads inconsistently: some endpoints answer
//! `{ "ok": true, "data": ... }`, others `{ "success": true, "data": ... }`,
//! and some return the payload bare. Everything past this module only sees an
//! [`ApiPayload`].

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{Error, Result};

const ACK_KEYS: [&str; 2] = ["ok", "success"];

/// Normalized API response body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiPayload {
    /// Value of the `ok`/`success` flag, when the body carried one.
    pub acknowledged: Option<bool>,
    /// Top-level `message`, when the body carried one.
    pub message: Option<String>,
    /// The inner payload.
    pub data: Value,
}

impl ApiPayload {
    pub fn from_body(body: Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        let acknowledged = match &body {
            Value::Object(map) => ACK_KEYS
                .iter()
                .find_map(|key| map.get(*key))
                .map(|flag| flag.as_bool().unwrap_or(!flag.is_null())),
            _ => None,
        };

        Self {
            acknowledged,
            message,
            data: unwrap_envelope(body),
        }
    }

    /// True when the envelope explicitly reported failure.
    pub fn is_rejected(&self) -> bool {
        self.acknowledged == Some(false)
    }

    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        serde_json::from_value(self.data).map_err(|e| Error::Decode(e.to_string()))
    }

    /// Decodes a list payload; anything that is not an array is treated as
    /// an empty list.
    pub fn decode_list<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        let Value::Array(items) = unwrap_list(self.data) else {
            return Ok(Vec::new());
        };
        items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(|e| Error::Decode(e.to_string())))
            .collect()
    }
}

/// Returns the inner payload of a response body.
///
/// An object carrying an `ok` or `success` key yields its `data` (null when
/// absent); any other body is already the payload.
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if ACK_KEYS.iter().any(|key| map.contains_key(*key)) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Like [`unwrap_envelope`], but a payload that is not an array becomes an
/// empty array.
pub fn unwrap_list(body: Value) -> Value {
    match unwrap_envelope(body) {
        list @ Value::Array(_) => list,
        _ => Value::Array(Vec::new()),
    }
}

/// Pulls a human-readable error message out of an error body.
///
/// Checked in order: `error.message`, `message`, `error` (as a string).
pub fn extract_error_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .or_else(|| body.get("message").and_then(Value::as_str))
        .or_else(|| body.get("error").and_then(Value::as_str))
        .map(str::to_string)
}

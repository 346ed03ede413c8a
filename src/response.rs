//! Response normalization.
//!
//! Every envelope names its own payload key through `rgpApiType`, so the
//! body is decoded into a plain JSON map first and the payload is pulled out
//! by that name. Paging metadata, when present, is lifted onto the result.

use crate::error::{Result, RgpError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const TYPE_KEY: &str = "rgpApiType";
pub const ERROR_FLAG_KEY: &str = "rgpApiError";
pub const PAGING_KEY: &str = "rgpApiPaging";
pub const STATUS_KEY: &str = "status";
pub const MESSAGE_KEY: &str = "message";
pub const ERROR_TYPE: &str = "error";

/// A decoded response body, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawBody {
    /// Plain text, only produced by the liveness check.
    Text(String),
    Json(Value),
}

/// What `get` hands back to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Normalized {
    Text(String),
    Canonical(CanonicalResult),
}

impl Normalized {
    pub fn into_canonical(self) -> Result<CanonicalResult> {
        match self {
            Normalized::Canonical(result) => Ok(result),
            Normalized::Text(_) => Err(RgpError::MalformedResponse(
                "expected a JSON envelope but got plain text".to_string(),
            )),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Normalized::Text(text) => Some(text),
            Normalized::Canonical(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalResult {
    pub data: Value,
    pub response: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Pages>,
}

impl CanonicalResult {
    /// The absolute URL of every page, in order. Empty when the result was
    /// not paginated.
    pub fn page_urls(&self) -> &[String] {
        self.pages.as_ref().map(Pages::urls).unwrap_or(&[])
    }

    /// The value of the type tag, e.g. `"facilities"`.
    pub fn api_type(&self) -> Option<&str> {
        self.response.get(TYPE_KEY).and_then(Value::as_str)
    }
}

/// The paging descriptor. Serializes back to exactly the value the API
/// sent; the URL list and totals are read out of it when recognizable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct Pages {
    raw: Value,
    urls: Vec<String>,
    item_total: Option<u64>,
    page_total: Option<u64>,
}

impl Pages {
    /// Page URLs in order. Empty when the descriptor is neither a list of
    /// strings nor an object whose `pages` is one.
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn item_total(&self) -> Option<u64> {
        self.item_total
    }

    pub fn page_total(&self) -> Option<u64> {
        self.page_total
    }

    pub fn as_value(&self) -> &Value {
        &self.raw
    }
}

impl From<Value> for Pages {
    fn from(raw: Value) -> Self {
        let (urls, item_total, page_total) = match &raw {
            Value::Array(items) => (string_list(items), None, None),
            Value::Object(map) => (
                map.get("pages")
                    .and_then(Value::as_array)
                    .map(|items| string_list(items))
                    .unwrap_or_default(),
                map.get("itemTotal").and_then(Value::as_u64),
                map.get("pageTotal").and_then(Value::as_u64),
            ),
            _ => (Vec::new(), None, None),
        };

        Pages {
            raw,
            urls,
            item_total,
            page_total,
        }
    }
}

impl From<Pages> for Value {
    fn from(pages: Pages) -> Self {
        pages.raw
    }
}

/// All-or-nothing: a list with any non-string entry yields no URLs.
fn string_list(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default()
}

/// Reshapes a raw body. Plain text passes through untouched.
pub fn normalize_body(body: RawBody) -> Result<Normalized> {
    match body {
        RawBody::Text(text) => Ok(Normalized::Text(text)),
        RawBody::Json(envelope) => normalize(envelope).map(Normalized::Canonical),
    }
}

/// Moves the payload named by the type tag into `data` and the paging
/// descriptor into `pages`; whatever else the envelope held becomes
/// `response`.
pub fn normalize(envelope: Value) -> Result<CanonicalResult> {
    let mut response = match envelope {
        Value::Object(map) => map,
        other => {
            return Err(RgpError::MalformedResponse(format!(
                "expected a JSON object envelope, got {}",
                json_kind(&other)
            )))
        }
    };

    let payload_key = match response.get(TYPE_KEY) {
        Some(Value::String(key)) => key.clone(),
        Some(other) => {
            return Err(RgpError::MalformedResponse(format!(
                "`{}` must be a string, got {}",
                TYPE_KEY,
                json_kind(other)
            )))
        }
        None => {
            return Err(RgpError::MalformedResponse(format!(
                "envelope is missing `{}`",
                TYPE_KEY
            )))
        }
    };

    // The tag names itself when the payload key is the tag key; never let
    // that pull the tag out of `response`.
    if payload_key == TYPE_KEY {
        return Err(RgpError::MalformedResponse(format!(
            "`{}` cannot name itself as the payload key",
            TYPE_KEY
        )));
    }

    let data = response.remove(&payload_key).ok_or_else(|| {
        RgpError::MalformedResponse(format!(
            "envelope of type `{}` has no `{}` payload",
            payload_key, payload_key
        ))
    })?;

    let pages = response.remove(PAGING_KEY).map(Pages::from);

    Ok(CanonicalResult {
        data,
        response,
        pages,
    })
}

/// Returns the API-reported failure carried by an envelope, if any.
pub(crate) fn envelope_error(envelope: &Value) -> Option<RgpError> {
    let map = envelope.as_object()?;

    let flagged = map.get(ERROR_FLAG_KEY).and_then(Value::as_bool) == Some(true);
    let error_typed = map.get(TYPE_KEY).and_then(Value::as_str) == Some(ERROR_TYPE);
    if !flagged && !error_typed {
        return None;
    }

    Some(RgpError::Api {
        status: map.get(STATUS_KEY).map(render_scalar).unwrap_or_default(),
        message: map.get(MESSAGE_KEY).map(render_scalar).unwrap_or_default(),
    })
}

/// Strings without their quotes, everything else as JSON text.
pub(crate) fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

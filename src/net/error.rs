//! Typed API failures.
//!
//! ERROR HANDLING
//! ==============
//! Every HTTP failure is folded into one fixed [`ApiError`] shape at the
//! client boundary, so pages and the session store branch on
//! [`ApiErrorKind`] instead of poking at raw JSON bodies.

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

use std::collections::BTreeMap;

use serde_json::Value;

/// Message used when a failure carries no server payload.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Failure taxonomy surfaced to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Login credentials were rejected.
    Authentication,
    /// Bearer token missing, expired or revoked.
    SessionInvalid,
    /// Server-side form validation failed.
    ValidationRejected,
    /// Transport failure, unexpected status, or undecodable body.
    RequestFailed,
    /// A delayed-execution hook refused an overlapping call.
    Busy,
}

/// Which endpoint family produced a response; drives status mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// `POST /token/`: a 401/400 means bad credentials.
    Token,
    /// Bearer-authenticated calls: a 401 means the session is gone.
    Authenticated,
    /// Unauthenticated calls (signup, interview scheduling).
    Public,
}

/// A failed API call.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status when a response was received.
    pub status: Option<u16>,
    /// Display-ready message.
    pub message: String,
    /// DRF-style field errors flattened to `path -> messages`.
    pub field_errors: Option<BTreeMap<String, Vec<String>>>,
    /// Raw response body when it parsed as JSON.
    pub payload: Option<Value>,
}

impl ApiError {
    #[must_use]
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self { kind, status: None, message: message.into(), field_errors: None, payload: None }
    }

    /// Network-level failure with no response.
    #[must_use]
    pub fn transport(err: &reqwest::Error) -> Self {
        Self::new(ApiErrorKind::RequestFailed, err.to_string())
    }

    #[must_use]
    pub fn busy() -> Self {
        Self::new(ApiErrorKind::Busy, "another request is already in progress")
    }

    /// Build an error from a non-success response.
    #[must_use]
    pub fn from_response(endpoint: Endpoint, status: u16, body: &str) -> Self {
        let payload = match serde_json::from_str::<Value>(body) {
            Ok(Value::Null) | Err(_) => None,
            Ok(value) => Some(value),
        };
        let kind = classify(endpoint, status);
        let message = match &payload {
            Some(value) => payload_message(value),
            None if body.trim().is_empty() => format!("request failed: HTTP {status}"),
            None => body.trim().to_owned(),
        };
        let field_errors = payload
            .as_ref()
            .filter(|_| kind == ApiErrorKind::ValidationRejected)
            .and_then(flatten_field_errors);
        Self { kind, status: Some(status), message, field_errors, payload }
    }

    /// String a view shows inline: the serialized server payload when one
    /// exists, otherwise the generic message.
    #[must_use]
    pub fn display_message(&self) -> String {
        match &self.payload {
            Some(value) => value.to_string(),
            None if self.kind == ApiErrorKind::Busy => self.message.clone(),
            None => GENERIC_ERROR_MESSAGE.to_owned(),
        }
    }

    /// A string field from the payload (e.g. `error`, `detail`, `message`).
    #[must_use]
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.as_ref()?.get(key)?.as_str()
    }

    #[must_use]
    pub fn is_session_invalid(&self) -> bool {
        self.kind == ApiErrorKind::SessionInvalid
    }
}

fn classify(endpoint: Endpoint, status: u16) -> ApiErrorKind {
    match (endpoint, status) {
        (Endpoint::Token, 400 | 401) => ApiErrorKind::Authentication,
        (Endpoint::Authenticated, 401) => ApiErrorKind::SessionInvalid,
        (_, 400) => ApiErrorKind::ValidationRejected,
        _ => ApiErrorKind::RequestFailed,
    }
}

fn payload_message(value: &Value) -> String {
    ["error", "detail", "message"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map_or_else(|| value.to_string(), ToOwned::to_owned)
}

/// Flatten `{ "user": { "email": ["taken"] }, "skills": ["required"] }` into
/// `{ "skills": [...], "user.email": [...] }`. Returns `None` when nothing
/// looks like a field error.
pub(crate) fn flatten_field_errors(value: &Value) -> Option<BTreeMap<String, Vec<String>>> {
    let mut out = BTreeMap::new();
    collect_field_errors("", value, &mut out);
    if out.is_empty() { None } else { Some(out) }
}

fn collect_field_errors(prefix: &str, value: &Value, out: &mut BTreeMap<String, Vec<String>>) {
    let Some(map) = value.as_object() else {
        return;
    };
    for (key, entry) in map {
        let path = if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };
        match entry {
            Value::Array(items) => {
                let messages: Vec<String> = items.iter().filter_map(Value::as_str).map(ToOwned::to_owned).collect();
                if !messages.is_empty() {
                    out.insert(path, messages);
                }
            }
            Value::Object(_) => collect_field_errors(&path, entry, out),
            _ => {}
        }
    }
}

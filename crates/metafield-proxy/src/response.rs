use serde::Serialize;
use serde_json::Value;

use crate::error::ProxyError;

/// Transport-neutral response produced by every handler.
///
/// The hosting glue turns it into a platform response; `body: None` means no body at all.
/// Bodies are kept serialized so struct field order reaches the wire unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ProxyResponse {
    fn with_json_body(status: u16, body: String) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Some(body),
        }
    }

    pub fn json(status: u16, body: Value) -> Self {
        Self::with_json_body(status, body.to_string())
    }

    pub fn ok<T: Serialize>(body: &T) -> Result<Self, ProxyError> {
        Ok(Self::with_json_body(200, serde_json::to_string(body)?))
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.set_header(name, value);
        self
    }

    /// Insert or replace a header (names compare case-insensitively).
    pub fn set_header(&mut self, name: &str, value: &str) {
        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Serialized body, empty for bodiless responses.
    pub fn body_string(&self) -> String {
        self.body.clone().unwrap_or_default()
    }

    /// Parsed body, `None` when there is no body or it is not JSON.
    pub fn json_body(&self) -> Option<Value> {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_str(b).ok())
    }
}

use serde_json::Value;

use crate::error::ProxyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamMethod {
    Get,
    Post,
}

/// An outbound call to BigCommerce, independent of the HTTP client that performs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub method: UpstreamMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl UpstreamRequest {
    pub fn get(url: String) -> Self {
        Self {
            method: UpstreamMethod::Get,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: String, body: String) -> Self {
        Self {
            method: UpstreamMethod::Post,
            url,
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// HTTP client seam for BigCommerce calls.
///
/// Implementations return `Err` only when no response was obtained at all; every HTTP
/// status, including errors, comes back as an [`UpstreamResponse`].
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait Upstream {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, ProxyError>;
}

/// Parse a success body. An empty body reads as `{}`.
pub fn parse_json(body: &str) -> Result<Value, ProxyError> {
    if body.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str(body).map_err(|source| ProxyError::InvalidPayload {
        body: body.to_string(),
        source,
    })
}

/// Send `request`, surface a non-2xx status as [`ProxyError::Upstream`] labelled with
/// `context`, and parse the body as JSON.
pub async fn fetch_json<U>(upstream: &U, request: UpstreamRequest, context: &'static str) -> Result<Value, ProxyError>
where
    U: Upstream + ?Sized,
{
    let resp = upstream.send(request).await?;
    if !resp.is_success() {
        return Err(ProxyError::Upstream {
            context,
            status: resp.status,
            body: resp.body,
        });
    }
    parse_json(&resp.body)
}

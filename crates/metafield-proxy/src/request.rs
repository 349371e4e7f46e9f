use subtle::ConstantTimeEq;

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::handler::Route;

pub const PROXY_KEY_HEADER: &str = "x-proxy-key";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Options,
    Other,
}

impl Method {
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("GET") {
            Method::Get
        } else if raw.eq_ignore_ascii_case("OPTIONS") {
            Method::Options
        } else {
            Method::Other
        }
    }
}

/// The parts of an inbound request the handlers look at.
///
/// Query pairs are expected to be percent-decoded already.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub origin: Option<String>,
    pub proxy_key: Option<String>,
}

impl ProxyRequest {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            origin: None,
            proxy_key: None,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origin = Some(origin.to_string());
        self
    }

    pub fn with_proxy_key(mut self, key: &str) -> Self {
        self.proxy_key = Some(key.to_string());
        self
    }

    /// The lookup route this request's path names, if any.
    pub fn route(&self) -> Option<Route> {
        Route::from_path(&self.path)
    }

    /// First value for `name`, if any.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Like [`ProxyRequest::query`] but treats an empty value as absent.
    pub fn query_non_empty(&self, name: &str) -> Option<&str> {
        self.query(name).filter(|v| !v.trim().is_empty())
    }
}

/// Parse a catalog identifier: a positive integer, surrounding whitespace allowed.
pub fn parse_id(raw: Option<&str>) -> Option<u64> {
    raw?.trim().parse::<u64>().ok().filter(|id| *id > 0)
}

/// CORS headers to attach for this origin.
///
/// No origin or no allow-list means no CORS headers; an origin outside a configured
/// allow-list is rejected.
pub fn cors_headers(config: &ProxyConfig, origin: Option<&str>) -> Result<Vec<(String, String)>, ProxyError> {
    let Some(origin) = origin.map(str::trim).filter(|o| !o.is_empty()) else {
        return Ok(Vec::new());
    };
    if config.allowed_origins.is_empty() {
        return Ok(Vec::new());
    }
    if !config.allowed_origins.iter().any(|allowed| allowed == origin) {
        return Err(ProxyError::OriginNotAllowed);
    }

    Ok(vec![
        ("Access-Control-Allow-Origin".to_string(), origin.to_string()),
        ("Vary".to_string(), "Origin".to_string()),
        ("Access-Control-Allow-Methods".to_string(), "GET, OPTIONS".to_string()),
        (
            "Access-Control-Allow-Headers".to_string(),
            format!("Content-Type, {PROXY_KEY_HEADER}"),
        ),
    ])
}

pub fn check_proxy_key(config: &ProxyConfig, provided: Option<&str>) -> Result<(), ProxyError> {
    let Some(required) = config.proxy_api_key.as_deref() else {
        return Ok(());
    };
    let Some(provided) = provided else {
        return Err(ProxyError::Unauthorized);
    };

    if bool::from(provided.as_bytes().ct_eq(required.as_bytes())) {
        Ok(())
    } else {
        Err(ProxyError::Unauthorized)
    }
}

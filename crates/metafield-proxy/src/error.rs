use serde_json::{json, Value};
use thiserror::Error;

use crate::response::ProxyResponse;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("bad request: {0}")]
    BadRequest(&'static str),

    #[error("origin not allowed")]
    OriginNotAllowed,

    #[error("unauthorized")]
    Unauthorized,

    #[error("server env not set")]
    MissingConfig { details: Value },

    #[error("{context} (status={status})")]
    Upstream {
        context: &'static str,
        status: u16,
        body: String,
    },

    #[error("invalid JSON from upstream: {source}")]
    InvalidPayload {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("GraphQL errors")]
    GraphQl { errors: Value },

    #[error("upstream request failed: {0}")]
    Transport(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Upstream statuses are forwarded as-is unless they cannot carry a JSON error body.
fn passthrough_status(status: u16) -> u16 {
    match status {
        204 | 205 | 304 => 502,
        200..=599 => status,
        _ => 502,
    }
}

impl ProxyError {
    pub fn status(&self) -> u16 {
        match self {
            ProxyError::MethodNotAllowed => 405,
            ProxyError::BadRequest(_) => 400,
            ProxyError::OriginNotAllowed | ProxyError::Unauthorized => 401,
            ProxyError::MissingConfig { .. } => 500,
            ProxyError::Upstream { status, .. } => passthrough_status(*status),
            ProxyError::InvalidPayload { .. } | ProxyError::GraphQl { .. } => 502,
            ProxyError::Transport(_) | ProxyError::Serialization(_) => 500,
        }
    }

    /// Whether the error points at a fault in this service rather than the caller or upstream.
    pub fn is_internal(&self) -> bool {
        matches!(self, ProxyError::Transport(_) | ProxyError::Serialization(_))
    }

    pub fn into_response(self) -> ProxyResponse {
        let status = self.status();
        match self {
            ProxyError::MethodNotAllowed => {
                ProxyResponse::error(status, "Method not allowed").with_header("Allow", "GET")
            }
            ProxyError::BadRequest(message) => ProxyResponse::error(status, message),
            ProxyError::OriginNotAllowed => ProxyResponse::error(status, "Origin not allowed"),
            ProxyError::Unauthorized => ProxyResponse::error(status, "Unauthorized"),
            ProxyError::MissingConfig { details } => ProxyResponse::json(
                status,
                json!({ "error": "Server env not set", "details": details }),
            ),
            ProxyError::Upstream {
                context,
                status: upstream_status,
                body,
            } => ProxyResponse::json(
                status,
                json!({ "error": context, "status": upstream_status, "details": body }),
            ),
            ProxyError::InvalidPayload { body, .. } => ProxyResponse::json(
                status,
                json!({ "error": "Invalid JSON from BigCommerce", "details": body }),
            ),
            ProxyError::GraphQl { errors } => ProxyResponse::json(
                status,
                json!({ "error": "GraphQL errors", "details": errors }),
            ),
            ProxyError::Transport(message) => ProxyResponse::json(
                status,
                json!({ "error": "Unexpected error", "details": message }),
            ),
            ProxyError::Serialization(err) => ProxyResponse::json(
                status,
                json!({ "error": "Unexpected error", "details": err.to_string() }),
            ),
        }
    }
}

#![allow(dead_code)]

use std::sync::Mutex;

use metafield_proxy::{
    MetafieldProxy, ProxyConfig, ProxyError, ProxyRequest, ProxyResponse, Route, Upstream,
    UpstreamRequest, UpstreamResponse,
};

pub const ADMIN_BASE: &str = "https://api.bigcommerce.com/stores/abc123/v3";
pub const SF_ENDPOINT: &str = "https://store-abc123.mybigcommerce.com/graphql";

enum Reply {
    Respond(u16, String),
    Fail(String),
}

/// In-memory BigCommerce: replies are keyed by exact URL, every call is recorded.
#[derive(Default)]
pub struct ScriptedUpstream {
    replies: Vec<(String, Reply)>,
    calls: Mutex<Vec<UpstreamRequest>>,
}

impl ScriptedUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, status: u16, body: impl Into<String>) -> Self {
        self.replies
            .push((url.to_string(), Reply::Respond(status, body.into())));
        self
    }

    pub fn fail(mut self, url: &str, message: &str) -> Self {
        self.replies
            .push((url.to_string(), Reply::Fail(message.to_string())));
        self
    }

    pub fn calls(&self) -> Vec<UpstreamRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl<'a> Upstream for &'a ScriptedUpstream {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, ProxyError> {
        let reply = self.replies.iter().find(|(url, _)| *url == request.url);
        self.calls.lock().unwrap().push(request);

        match reply {
            Some((_, Reply::Respond(status, body))) => Ok(UpstreamResponse {
                status: *status,
                body: body.clone(),
            }),
            Some((_, Reply::Fail(message))) => Err(ProxyError::Transport(message.clone())),
            None => Ok(UpstreamResponse {
                status: 404,
                body: "unscripted".to_string(),
            }),
        }
    }
}

/// Store `abc123` with both tokens set and every optional knob left at its default.
pub fn config() -> ProxyConfig {
    ProxyConfig {
        store_hash: Some("abc123".to_string()),
        admin_token: Some("admin-token".to_string()),
        sf_token: Some("sf-token-0123456789".to_string()),
        ..ProxyConfig::from_lookup(|_| None)
    }
}

pub fn run(
    config: ProxyConfig,
    upstream: &ScriptedUpstream,
    route: Route,
    req: ProxyRequest,
) -> ProxyResponse {
    let proxy = MetafieldProxy::new(config, upstream);
    futures::executor::block_on(proxy.handle(route, &req))
}

pub fn metafields_body(items: serde_json::Value) -> String {
    serde_json::json!({ "data": items, "meta": {} }).to_string()
}

use std::sync::OnceLock;

use worker::*;

use metafield_proxy::MetafieldProxy;

#[path = "wasm/env.rs"]
pub mod env;
#[path = "wasm/http.rs"]
pub mod http;
#[path = "wasm/upstream.rs"]
pub mod upstream;

use http::{internal_error_response, into_worker_response, not_found, proxy_request};
use upstream::WorkerUpstream;

/// Built from the first request's `Env` and reused for the lifetime of the isolate.
static PROXY: OnceLock<MetafieldProxy<WorkerUpstream>> = OnceLock::new();

#[event(fetch)]
pub async fn fetch(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    console_error_panic_hook::set_once();

    let url = req.url()?;
    let path = url.path();

    if req.method() == Method::Get && path == "/health" {
        let body = serde_json::json!({
            "ok": true,
            "service": "metafield-proxy",
        });
        return Response::from_json(&body);
    }

    let proxy_req = match proxy_request(&req) {
        Ok(r) => r,
        Err(e) => return internal_error_response("Failed to read inbound request", &e),
    };
    let Some(route) = proxy_req.route() else {
        return not_found();
    };

    let proxy = PROXY.get_or_init(|| MetafieldProxy::new(env::load_config(&env), WorkerUpstream));

    let resp = proxy
        .handle_observed(route, &proxy_req, |err| {
            if err.is_internal() {
                console_error!("[{path}] unexpected error: {err}");
            } else {
                console_log!("[{path}] {} {err}", err.status());
            }
        })
        .await;

    match into_worker_response(resp) {
        Ok(resp) => Ok(resp),
        Err(e) => internal_error_response("Failed to build response", &e),
    }
}

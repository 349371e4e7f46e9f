use std::fmt::Display;

use worker::{Method, Request, Response, Result};

use metafield_proxy::request::PROXY_KEY_HEADER;
use metafield_proxy::{Method as ProxyMethod, ProxyRequest, ProxyResponse};

pub fn proxy_request(req: &Request) -> Result<ProxyRequest> {
    let method = match req.method() {
        Method::Get => ProxyMethod::Get,
        Method::Options => ProxyMethod::Options,
        _ => ProxyMethod::Other,
    };

    let url = req.url()?;
    let query = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    Ok(ProxyRequest {
        method,
        path: url.path().to_string(),
        query,
        origin: req.headers().get("Origin")?,
        proxy_key: req.headers().get(PROXY_KEY_HEADER)?,
    })
}

pub fn into_worker_response(resp: ProxyResponse) -> Result<Response> {
    let mut out = match resp.body {
        Some(body) => Response::ok(body)?,
        None => Response::empty()?,
    }
    .with_status(resp.status);

    let headers = out.headers_mut();
    for (name, value) in &resp.headers {
        headers.set(name, value)?;
    }

    Ok(out)
}

pub fn error_response(status: u16, message: &str) -> Result<Response> {
    let body = serde_json::json!({ "error": message });
    Ok(Response::from_json(&body)?.with_status(status))
}

pub fn internal_error_response<E: Display>(context: &str, err: &E) -> Result<Response> {
    worker::console_error!("{context}: {err}");
    error_response(500, "Unexpected error")
}

pub fn not_found() -> Result<Response> {
    error_response(404, "Not found")
}

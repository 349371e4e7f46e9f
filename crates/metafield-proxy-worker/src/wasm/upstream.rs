use worker::{Fetch, Headers, Method, Request, RequestInit, Url};

use metafield_proxy::{ProxyError, Upstream, UpstreamMethod, UpstreamRequest, UpstreamResponse};

/// `Upstream` backed by the Workers `fetch` API.
pub struct WorkerUpstream;

/// URL path only; query strings and hosts stay out of the logs.
fn log_target(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| "<invalid url>".to_string())
}

async fn send_request(request: &UpstreamRequest) -> worker::Result<UpstreamResponse> {
    let headers = Headers::new();
    for (name, value) in &request.headers {
        headers.set(name, value)?;
    }

    let mut init = RequestInit::new();
    init.with_method(match request.method {
        UpstreamMethod::Get => Method::Get,
        UpstreamMethod::Post => Method::Post,
    });
    init.with_headers(headers);
    if let Some(body) = &request.body {
        init.with_body(Some(body.clone().into()));
    }

    let req = Request::new_with_init(&request.url, &init)?;
    let mut resp = Fetch::Request(req).send().await?;
    let status = resp.status_code();
    let body = resp.text().await?;

    Ok(UpstreamResponse { status, body })
}

#[async_trait::async_trait(?Send)]
impl Upstream for WorkerUpstream {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, ProxyError> {
        let verb = match request.method {
            UpstreamMethod::Get => "GET",
            UpstreamMethod::Post => "POST",
        };
        let target = log_target(&request.url);

        match send_request(&request).await {
            Ok(resp) => {
                worker::console_log!("{verb} {target} -> {}", resp.status);
                Ok(resp)
            }
            Err(e) => {
                worker::console_error!("{verb} {target} failed: {e}");
                Err(ProxyError::Transport(e.to_string()))
            }
        }
    }
}

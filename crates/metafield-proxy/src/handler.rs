use serde_json::json;

use crate::admin::AdminClient;
use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::model::{ProductFieldsBody, StorefrontProductBody, VariantMetafieldBody};
use crate::projection::find_metafield;
use crate::request::{check_proxy_key, cors_headers, parse_id, Method, ProxyRequest};
use crate::response::ProxyResponse;
use crate::storefront::StorefrontClient;
use crate::upstream::Upstream;

/// The lookup endpoints served by the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/api/variant-metafield`: one field of one variant via Admin REST.
    VariantMetafield,
    /// `/api/variant-metafields`: a namespace across every variant of a product via Admin REST.
    VariantMetafields,
    /// `/api/variant-metafields-sf`: the same lookup via Storefront GraphQL.
    VariantMetafieldsStorefront,
}

impl Route {
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        match path {
            "/api/variant-metafield" => Some(Route::VariantMetafield),
            "/api/variant-metafields" => Some(Route::VariantMetafields),
            "/api/variant-metafields-sf" => Some(Route::VariantMetafieldsStorefront),
            _ => None,
        }
    }
}

/// Tokens shorter than this are never partially revealed.
const MASK_MIN_LEN: usize = 16;

/// `abcd…wxyz` for long tokens, `…` for short ones, empty when unset.
pub fn mask_token(token: Option<&str>) -> String {
    let Some(token) = token else {
        return String::new();
    };
    let chars: Vec<char> = token.chars().collect();
    if chars.len() < MASK_MIN_LEN {
        return "…".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

pub struct MetafieldProxy<U> {
    config: ProxyConfig,
    upstream: U,
}

impl<U> MetafieldProxy<U>
where
    U: Upstream,
{
    pub fn new(config: ProxyConfig, upstream: U) -> Self {
        Self { config, upstream }
    }

    pub async fn handle(&self, route: Route, req: &ProxyRequest) -> ProxyResponse {
        self.handle_observed(route, req, |_| {}).await
    }

    /// Serve `req` on `route`, reporting any error to `observe` before it is turned
    /// into a response.
    pub async fn handle_observed<F>(&self, route: Route, req: &ProxyRequest, observe: F) -> ProxyResponse
    where
        F: FnOnce(&ProxyError),
    {
        match self.try_handle(route, req).await {
            Ok(resp) => resp,
            Err((err, cors)) => {
                observe(&err);
                let mut resp = err.into_response();
                for (name, value) in &cors {
                    resp.set_header(name, value);
                }
                resp
            }
        }
    }

    /// Errors carry the CORS headers already granted so the caller can still read them.
    async fn try_handle(
        &self,
        route: Route,
        req: &ProxyRequest,
    ) -> Result<ProxyResponse, (ProxyError, Vec<(String, String)>)> {
        if req.method == Method::Other {
            let cors = cors_headers(&self.config, req.origin.as_deref()).unwrap_or_default();
            return Err((ProxyError::MethodNotAllowed, cors));
        }

        let cors = cors_headers(&self.config, req.origin.as_deref()).map_err(|e| (e, Vec::new()))?;

        let result = match req.method {
            Method::Options => Ok(ProxyResponse::empty(204)),
            _ => match check_proxy_key(&self.config, req.proxy_key.as_deref()) {
                Ok(()) => self.dispatch(route, req).await,
                Err(e) => Err(e),
            },
        };

        match result {
            Ok(mut resp) => {
                for (name, value) in &cors {
                    resp.set_header(name, value);
                }
                Ok(resp)
            }
            Err(e) => Err((e, cors)),
        }
    }

    async fn dispatch(&self, route: Route, req: &ProxyRequest) -> Result<ProxyResponse, ProxyError> {
        match route {
            Route::VariantMetafield => self.variant_metafield(req).await,
            Route::VariantMetafields => self.variant_metafields(req).await,
            Route::VariantMetafieldsStorefront => self.variant_metafields_sf(req).await,
        }
    }

    fn admin_credentials(&self) -> Result<(&str, &str), ProxyError> {
        match (self.config.store_hash.as_deref(), self.config.admin_token.as_deref()) {
            (Some(hash), Some(token)) => Ok((hash, token)),
            (hash, token) => Err(ProxyError::MissingConfig {
                details: json!({
                    "hasStoreHash": hash.is_some(),
                    "hasAdminToken": token.is_some(),
                }),
            }),
        }
    }

    fn storefront_credentials(&self) -> Result<(&str, &str), ProxyError> {
        match (self.config.store_hash.as_deref(), self.config.sf_token.as_deref()) {
            (Some(hash), Some(token)) => Ok((hash, token)),
            (hash, token) => Err(ProxyError::MissingConfig {
                details: json!({
                    "hasStoreHash": hash.is_some(),
                    "hasSfToken": token.is_some(),
                }),
            }),
        }
    }

    async fn variant_metafield(&self, req: &ProxyRequest) -> Result<ProxyResponse, ProxyError> {
        let variant_id = parse_id(req.query("variantId"))
            .ok_or(ProxyError::BadRequest("variantId is required and must be a number"))?;
        let namespace = req.query_non_empty("namespace").unwrap_or(self.config.namespace.as_str());
        let key = req.query_non_empty("key").unwrap_or(self.config.key.as_str());

        let (store_hash, token) = self.admin_credentials()?;
        let client = AdminClient::new(&self.upstream, &self.config, store_hash, token);
        let items = client.variant_metafields(variant_id).await?;

        let value = find_metafield(&items, namespace, key).and_then(|mf| mf.value.clone());
        ProxyResponse::ok(&VariantMetafieldBody {
            variant_id,
            namespace: namespace.to_string(),
            key: key.to_string(),
            value,
        })
    }

    async fn variant_metafields(&self, req: &ProxyRequest) -> Result<ProxyResponse, ProxyError> {
        let product_id = parse_id(req.query("productId"))
            .ok_or(ProxyError::BadRequest("Missing or invalid productId"))?;
        let key = req.query_non_empty("key");

        let (store_hash, token) = self.admin_credentials()?;
        let client = AdminClient::new(&self.upstream, &self.config, store_hash, token);
        let variants = client
            .product_fields(product_id, &self.config.namespace, key)
            .await?;

        ProxyResponse::ok(&ProductFieldsBody {
            product_id,
            namespace: self.config.namespace.clone(),
            variants,
        })
    }

    async fn variant_metafields_sf(&self, req: &ProxyRequest) -> Result<ProxyResponse, ProxyError> {
        if self.config.debug_endpoints {
            match req.query("debug") {
                Some("env") => return Ok(self.debug_env()),
                Some("ping") => return self.debug_ping().await,
                _ => {}
            }
        }

        let product_id = parse_id(req.query("productId"))
            .ok_or(ProxyError::BadRequest("Missing or invalid productId"))?;

        let (store_hash, token) = self.storefront_credentials()?;
        let client = StorefrontClient::new(&self.upstream, &self.config, store_hash, token);
        let keys = [self.config.key.clone()];
        let variants = client
            .product_variants(product_id, &self.config.namespace, &keys)
            .await?;

        ProxyResponse::ok(&StorefrontProductBody {
            product_id,
            variants,
        })
    }

    fn debug_env(&self) -> ProxyResponse {
        let endpoint = self
            .config
            .store_hash
            .as_deref()
            .map(|hash| self.config.graphql_endpoint(hash))
            .or_else(|| self.config.sf_graphql_endpoint.clone());

        ProxyResponse::json(
            200,
            json!({
                "hasStoreHash": self.config.store_hash.is_some(),
                "hasSfToken": self.config.sf_token.is_some(),
                "tokenPreview": mask_token(self.config.sf_token.as_deref()),
                "endpoint": endpoint,
            }),
        )
    }

    async fn debug_ping(&self) -> Result<ProxyResponse, ProxyError> {
        let (store_hash, token) = self.storefront_credentials()?;
        let client = StorefrontClient::new(&self.upstream, &self.config, store_hash, token);
        let resp = client.ping().await?;

        Ok(ProxyResponse::json(
            200,
            json!({
                "ok": resp.is_success(),
                "status": resp.status,
                "endpoint": client.endpoint(),
                "body": resp.body,
            }),
        ))
    }
}

use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::model::{Metafield, Variant, VariantFields};
use crate::projection::namespace_fields;
use crate::upstream::{fetch_json, parse_json, Upstream, UpstreamRequest};

/// BigCommerce caps catalog list pages at 250 entries.
pub const PAGE_LIMIT: u32 = 250;

/// Entries of the `data` array in an Admin REST envelope.
///
/// A missing or non-array `data` reads as empty; entries that do not match `T` are skipped.
pub fn data_items<T: DeserializeOwned>(payload: Value) -> Vec<T> {
    let Value::Object(mut envelope) = payload else {
        return Vec::new();
    };
    match envelope.remove("data") {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// Admin REST (`/v3/catalog`) calls for one store.
pub struct AdminClient<'a, U: ?Sized> {
    upstream: &'a U,
    base: String,
    token: &'a str,
    client_id: Option<&'a str>,
}

impl<'a, U> AdminClient<'a, U>
where
    U: Upstream + ?Sized,
{
    pub fn new(upstream: &'a U, config: &'a ProxyConfig, store_hash: &str, token: &'a str) -> Self {
        Self {
            upstream,
            base: config.admin_base(store_hash),
            token,
            client_id: config.oauth_client_id.as_deref(),
        }
    }

    fn request(&self, path: &str) -> UpstreamRequest {
        let req = UpstreamRequest::get(format!("{}{path}", self.base))
            .with_header("Accept", "application/json")
            .with_header("Content-Type", "application/json")
            .with_header("X-Auth-Token", self.token);
        match self.client_id {
            Some(client_id) => req.with_header("X-Auth-Client", client_id),
            None => req,
        }
    }

    /// `GET /catalog/variants/{id}/metafields`
    pub async fn variant_metafields(&self, variant_id: u64) -> Result<Vec<Metafield>, ProxyError> {
        let req = self.request(&format!("/catalog/variants/{variant_id}/metafields"));
        let payload = fetch_json(self.upstream, req, "BigCommerce error").await?;
        Ok(data_items(payload))
    }

    /// `GET /catalog/products/{id}`, used only to fail fast on unknown products.
    pub async fn ensure_product(&self, product_id: u64) -> Result<(), ProxyError> {
        let req = self.request(&format!("/catalog/products/{product_id}"));
        fetch_json(self.upstream, req, "BigCommerce product fetch failed").await?;
        Ok(())
    }

    pub async fn product_variants(&self, product_id: u64) -> Result<Vec<Variant>, ProxyError> {
        let req = self.request(&format!(
            "/catalog/products/{product_id}/variants?limit={PAGE_LIMIT}"
        ));
        let payload = fetch_json(self.upstream, req, "BigCommerce variants fetch failed").await?;
        Ok(data_items(payload))
    }

    /// Metafields of one variant projected onto `namespace`. Never fails: a failed
    /// fetch yields an entry with empty `fields` and the failure recorded on it.
    pub async fn variant_fields(&self, variant: &Variant, namespace: &str, key: Option<&str>) -> VariantFields {
        let req = self.request(&format!(
            "/catalog/variants/{}/metafields?limit={PAGE_LIMIT}",
            variant.id
        ));

        let resp = match self.upstream.send(req).await {
            Ok(resp) => resp,
            Err(e) => return VariantFields::degraded(variant, None, e.to_string()),
        };
        if !resp.is_success() {
            return VariantFields::degraded(variant, Some(resp.status), format!("HTTP {}", resp.status));
        }
        let payload = match parse_json(&resp.body) {
            Ok(payload) => payload,
            Err(_) => {
                return VariantFields::degraded(variant, None, "Invalid JSON from BigCommerce".to_string())
            }
        };

        let items: Vec<Metafield> = data_items(payload);
        VariantFields {
            variant_id: variant.id,
            sku: variant.sku.clone(),
            fields: namespace_fields(&items, namespace, key),
            status: None,
            error: None,
        }
    }

    /// Product check, variant listing, then one concurrent metafield fetch per variant.
    ///
    /// Output keeps variant-list order.
    pub async fn product_fields(
        &self,
        product_id: u64,
        namespace: &str,
        key: Option<&str>,
    ) -> Result<Vec<VariantFields>, ProxyError> {
        self.ensure_product(product_id).await?;
        let variants = self.product_variants(product_id).await?;

        let lookups = variants
            .iter()
            .map(|variant| self.variant_fields(variant, namespace, key));
        Ok(join_all(lookups).await)
    }
}

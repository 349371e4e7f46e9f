use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::model::{KeyValue, StorefrontVariant};
use crate::upstream::{parse_json, Upstream, UpstreamRequest, UpstreamResponse};

const VARIANT_METAFIELDS_QUERY: &str = r#"
query VariantMetafields($productId: Int!, $namespace: String!, $keys: [String!]!) {
  site {
    product(entityId: $productId) {
      entityId
      variants(first: 250) {
        edges {
          node {
            entityId
            sku
            metafields(namespace: $namespace, keys: $keys) {
              edges {
                node {
                  key
                  value
                }
              }
            }
          }
        }
      }
    }
  }
}
"#;

const PING_QUERY: &str = "query Ping { site { settings { storeName } } }";

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a, V: Serialize> {
    query: &'a str,
    variables: V,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VariantMetafieldsVariables<'a> {
    product_id: u64,
    namespace: &'a str,
    keys: &'a [String],
}

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope {
    data: Option<Value>,
    errors: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    edges: Option<Vec<Edge<T>>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

impl<T> Connection<T> {
    fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.unwrap_or_default().into_iter().map(|e| e.node)
    }
}

#[derive(Debug, Deserialize)]
struct SiteData {
    site: Option<Site>,
}

#[derive(Debug, Deserialize)]
struct Site {
    product: Option<Product>,
}

#[derive(Debug, Deserialize)]
struct Product {
    variants: Option<Connection<VariantNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VariantNode {
    entity_id: u64,
    sku: Option<String>,
    metafields: Option<Connection<KeyValue>>,
}

/// Extract variants from a VariantMetafields response body.
///
/// An unknown product (`product: null`) yields no variants. GraphQL-level `errors`
/// take precedence over any partial `data`.
pub fn parse_variant_metafields(body: &str) -> Result<Vec<StorefrontVariant>, ProxyError> {
    let payload = parse_json(body)?;
    let invalid = |source: serde_json::Error| ProxyError::InvalidPayload {
        body: body.to_string(),
        source,
    };

    let envelope: GraphQlEnvelope = serde_json::from_value(payload).map_err(invalid)?;
    if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
        return Err(ProxyError::GraphQl {
            errors: Value::Array(errors),
        });
    }

    let Some(data) = envelope.data.filter(|d| !d.is_null()) else {
        return Ok(Vec::new());
    };
    let data: SiteData = serde_json::from_value(data).map_err(invalid)?;

    let variants = data
        .site
        .and_then(|s| s.product)
        .and_then(|p| p.variants)
        .map(|c| c.into_nodes().collect::<Vec<_>>())
        .unwrap_or_default();

    Ok(variants
        .into_iter()
        .map(|node| StorefrontVariant {
            variant_id: node.entity_id,
            sku: node.sku,
            metafields: node
                .metafields
                .map(|c| c.into_nodes().collect())
                .unwrap_or_default(),
        })
        .collect())
}

/// Storefront GraphQL calls for one store/channel.
pub struct StorefrontClient<'a, U: ?Sized> {
    upstream: &'a U,
    endpoint: String,
    token: &'a str,
    channel_id: Option<&'a str>,
}

impl<'a, U> StorefrontClient<'a, U>
where
    U: Upstream + ?Sized,
{
    pub fn new(upstream: &'a U, config: &'a ProxyConfig, store_hash: &str, token: &'a str) -> Self {
        Self {
            upstream,
            endpoint: config.graphql_endpoint(store_hash),
            token,
            channel_id: config.channel_id.as_deref(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request<V: Serialize>(&self, query: &str, variables: V) -> Result<UpstreamRequest, ProxyError> {
        let body = serde_json::to_string(&GraphQlRequest { query, variables })?;
        let bearer = format!("Bearer {}", self.token);

        let req = UpstreamRequest::post(self.endpoint.clone(), body)
            .with_header("Content-Type", "application/json")
            .with_header("Accept", "application/json")
            .with_header("Authorization", &bearer)
            .with_header("X-Auth-Token", self.token);
        Ok(match self.channel_id {
            Some(channel_id) => req.with_header("X-Channel-Id", channel_id),
            None => req,
        })
    }

    pub async fn product_variants(
        &self,
        product_id: u64,
        namespace: &str,
        keys: &[String],
    ) -> Result<Vec<StorefrontVariant>, ProxyError> {
        let req = self.request(
            VARIANT_METAFIELDS_QUERY,
            VariantMetafieldsVariables {
                product_id,
                namespace,
                keys,
            },
        )?;

        let resp = self.upstream.send(req).await?;
        if !resp.is_success() {
            return Err(ProxyError::Upstream {
                context: "Storefront GraphQL error",
                status: resp.status,
                body: resp.body,
            });
        }
        parse_variant_metafields(&resp.body)
    }

    /// Minimal round trip used by the `debug=ping` diagnostic. Any status is returned as-is.
    pub async fn ping(&self) -> Result<UpstreamResponse, ProxyError> {
        let req = self.request(PING_QUERY, serde_json::json!({}))?;
        self.upstream.send(req).await
    }
}

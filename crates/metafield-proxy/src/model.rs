use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A namespaced key/value annotation on a catalog variant, as BigCommerce returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metafield {
    pub namespace: String,
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// The slice of an Admin REST variant record this proxy reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Variant {
    pub id: u64,
    #[serde(default)]
    pub sku: Option<String>,
}

/// `GET /api/variant-metafield` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantMetafieldBody {
    pub variant_id: u64,
    pub namespace: String,
    pub key: String,
    pub value: Option<String>,
}

/// One variant in the Admin REST per-product projection.
///
/// `status`/`error` are only present when this variant's metafield fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantFields {
    pub variant_id: u64,
    pub sku: Option<String>,
    pub fields: BTreeMap<String, Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VariantFields {
    pub fn degraded(variant: &Variant, status: Option<u16>, error: String) -> Self {
        Self {
            variant_id: variant.id,
            sku: variant.sku.clone(),
            fields: BTreeMap::new(),
            status,
            error: Some(error),
        }
    }
}

/// `GET /api/variant-metafields` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFieldsBody {
    pub product_id: u64,
    pub namespace: String,
    pub variants: Vec<VariantFields>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontVariant {
    pub variant_id: u64,
    pub sku: Option<String>,
    pub metafields: Vec<KeyValue>,
}

/// `GET /api/variant-metafields-sf` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontProductBody {
    pub product_id: u64,
    pub variants: Vec<StorefrontVariant>,
}

mod common;

use common::{config, metafields_body, run, ScriptedUpstream, ADMIN_BASE};
use metafield_proxy::{ProxyConfig, ProxyRequest, Route};
use serde_json::json;

const PRODUCT_ID: u64 = 1538;

fn product_url() -> String {
    format!("{ADMIN_BASE}/catalog/products/{PRODUCT_ID}")
}

fn variants_url() -> String {
    format!("{ADMIN_BASE}/catalog/products/{PRODUCT_ID}/variants?limit=250")
}

fn variant_metafields_url(variant_id: u64) -> String {
    format!("{ADMIN_BASE}/catalog/variants/{variant_id}/metafields?limit=250")
}

fn lookup() -> ProxyRequest {
    ProxyRequest::get("/api/variant-metafields").with_query("productId", &PRODUCT_ID.to_string())
}

/// Product 1538 with three variants; each variant's metafields are scripted by the caller.
fn catalog() -> ScriptedUpstream {
    ScriptedUpstream::new()
        .respond(&product_url(), 200, json!({ "data": { "id": PRODUCT_ID } }).to_string())
        .respond(
            &variants_url(),
            200,
            json!({ "data": [
                { "id": 101, "sku": "TEE-S" },
                { "id": 102, "sku": "TEE-M" },
                { "id": 103, "sku": "TEE-L" }
            ] })
            .to_string(),
        )
}

fn description(value: &str) -> serde_json::Value {
    json!({ "namespace": "SecondaryDesc", "key": "Secondary Attribute Description", "value": value })
}

#[test]
fn zero_product_id_is_bad_request() {
    let upstream = ScriptedUpstream::new();
    let req = ProxyRequest::get("/api/variant-metafields").with_query("productId", "0");

    let resp = run(config(), &upstream, Route::VariantMetafields, req);
    assert_eq!(resp.status, 400);
    assert_eq!(resp.body_string(), r#"{"error":"Missing or invalid productId"}"#);
    assert_eq!(upstream.call_count(), 0);
}

#[test]
fn every_variant_is_projected_onto_the_namespace() {
    let upstream = catalog()
        .respond(
            &variant_metafields_url(101),
            200,
            metafields_body(json!([
                description("small"),
                { "namespace": "SecondaryDesc", "key": "Fit", "value": "slim" },
                { "namespace": "Other", "key": "Ignored", "value": "x" }
            ])),
        )
        .respond(&variant_metafields_url(102), 200, metafields_body(json!([description("medium")])))
        .respond(&variant_metafields_url(103), 200, metafields_body(json!([])));

    let resp = run(config(), &upstream, Route::VariantMetafields, lookup());
    assert_eq!(resp.status, 200);
    assert_eq!(
        resp.json_body().unwrap(),
        json!({
            "productId": PRODUCT_ID,
            "namespace": "SecondaryDesc",
            "variants": [
                {
                    "variantId": 101,
                    "sku": "TEE-S",
                    "fields": { "Fit": "slim", "Secondary Attribute Description": "small" }
                },
                {
                    "variantId": 102,
                    "sku": "TEE-M",
                    "fields": { "Secondary Attribute Description": "medium" }
                },
                { "variantId": 103, "sku": "TEE-L", "fields": {} }
            ]
        })
    );
    // product check + variant list + one fetch per variant
    assert_eq!(upstream.call_count(), 5);
}

#[test]
fn one_failing_variant_degrades_only_its_entry() {
    let upstream = catalog()
        .respond(&variant_metafields_url(101), 200, metafields_body(json!([description("small")])))
        .respond(&variant_metafields_url(102), 500, "internal")
        .respond(&variant_metafields_url(103), 200, metafields_body(json!([description("large")])));

    let resp = run(config(), &upstream, Route::VariantMetafields, lookup());
    assert_eq!(resp.status, 200);

    let body = resp.json_body().unwrap();
    let variants = body["variants"].as_array().unwrap();
    assert_eq!(variants.len(), 3);
    assert_eq!(
        variants[1],
        json!({ "variantId": 102, "sku": "TEE-M", "fields": {}, "status": 500, "error": "HTTP 500" })
    );
    assert_eq!(variants[0]["fields"]["Secondary Attribute Description"], "small");
    assert_eq!(variants[2]["fields"]["Secondary Attribute Description"], "large");
    assert!(variants[0].get("error").is_none());
}

#[test]
fn transport_failure_on_a_variant_is_marked_without_status() {
    let upstream = catalog()
        .respond(&variant_metafields_url(101), 200, metafields_body(json!([])))
        .fail(&variant_metafields_url(102), "socket hang up")
        .respond(&variant_metafields_url(103), 200, "not json");

    let body = run(config(), &upstream, Route::VariantMetafields, lookup())
        .json_body()
        .unwrap();
    let variants = body["variants"].as_array().unwrap();

    assert!(variants[1].get("status").is_none());
    assert!(variants[1]["error"].as_str().unwrap().contains("socket hang up"));
    assert_eq!(variants[1]["fields"], json!({}));
    assert_eq!(variants[2]["error"], "Invalid JSON from BigCommerce");
}

#[test]
fn key_query_narrows_fields() {
    let upstream = catalog()
        .respond(
            &variant_metafields_url(101),
            200,
            metafields_body(json!([
                description("small"),
                { "namespace": "SecondaryDesc", "key": "Fit", "value": "slim" }
            ])),
        )
        .respond(&variant_metafields_url(102), 200, metafields_body(json!([])))
        .respond(&variant_metafields_url(103), 200, metafields_body(json!([])));

    let body = run(config(), &upstream, Route::VariantMetafields, lookup().with_query("key", "Fit"))
        .json_body()
        .unwrap();
    assert_eq!(body["variants"][0]["fields"], json!({ "Fit": "slim" }));
}

#[test]
fn unknown_product_stops_before_listing_variants() {
    let upstream = ScriptedUpstream::new().respond(
        &product_url(),
        404,
        r#"{"status":404,"title":"The requested product was not found."}"#,
    );

    let resp = run(config(), &upstream, Route::VariantMetafields, lookup());
    assert_eq!(resp.status, 404);
    let body = resp.json_body().unwrap();
    assert_eq!(body["error"], "BigCommerce product fetch failed");
    assert_eq!(body["status"], 404);
    assert_eq!(upstream.call_count(), 1);
}

#[test]
fn variant_listing_failure_passes_through() {
    let upstream = ScriptedUpstream::new()
        .respond(&product_url(), 200, "{}")
        .respond(&variants_url(), 429, "Too Many Requests");

    let resp = run(config(), &upstream, Route::VariantMetafields, lookup());
    assert_eq!(resp.status, 429);
    let body = resp.json_body().unwrap();
    assert_eq!(body["error"], "BigCommerce variants fetch failed");
    assert_eq!(body["details"], "Too Many Requests");
}

#[test]
fn product_without_variants_returns_empty_list() {
    let upstream = ScriptedUpstream::new()
        .respond(&product_url(), 200, "{}")
        .respond(&variants_url(), 200, json!({ "data": [] }).to_string());

    let body = run(config(), &upstream, Route::VariantMetafields, lookup())
        .json_body()
        .unwrap();
    assert_eq!(body["variants"], json!([]));
}

#[test]
fn missing_admin_token_is_reported() {
    let upstream = ScriptedUpstream::new();
    let cfg = ProxyConfig {
        admin_token: None,
        ..config()
    };

    let resp = run(cfg, &upstream, Route::VariantMetafields, lookup());
    assert_eq!(resp.status, 500);
    assert_eq!(
        resp.json_body().unwrap()["details"],
        json!({ "hasStoreHash": true, "hasAdminToken": false })
    );
}

#[test]
fn configured_namespace_is_used() {
    let upstream = catalog()
        .respond(
            &variant_metafields_url(101),
            200,
            metafields_body(json!([
                description("ignored"),
                { "namespace": "Care", "key": "Washing", "value": "cold" }
            ])),
        )
        .respond(&variant_metafields_url(102), 200, metafields_body(json!([])))
        .respond(&variant_metafields_url(103), 200, metafields_body(json!([])));
    let cfg = ProxyConfig {
        namespace: "Care".to_string(),
        ..config()
    };

    let body = run(cfg, &upstream, Route::VariantMetafields, lookup())
        .json_body()
        .unwrap();
    assert_eq!(body["namespace"], "Care");
    assert_eq!(body["variants"][0]["fields"], json!({ "Washing": "cold" }));
}

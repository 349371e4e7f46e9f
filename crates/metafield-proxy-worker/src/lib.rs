#[cfg(target_arch = "wasm32")]
mod worker_wasm;

#[cfg(target_arch = "wasm32")]
pub use worker_wasm::*;

/// This crate is intended to be built for Cloudflare Workers (wasm32-unknown-unknown).
///
/// The lookup logic itself lives in `metafield-proxy` and is tested natively; this
/// tiny non-wasm surface keeps `cargo check` working on typical dev machines.
#[cfg(not(target_arch = "wasm32"))]
pub fn build_target_hint() -> &'static str {
    "metafield-proxy-worker is intended for wasm32-unknown-unknown (Cloudflare Workers)"
}

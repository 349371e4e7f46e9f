//! Read-only proxy for BigCommerce variant metafields.
//!
//! Browser storefronts call the lookup routes with a variant or product id; the proxy
//! calls the Admin REST or Storefront GraphQL API with a server-held token and returns
//! a small JSON projection. Everything here is platform independent: HTTP I/O goes
//! through the [`Upstream`] trait and the hosting glue converts [`ProxyRequest`] and
//! [`ProxyResponse`] to and from its own types.

pub mod admin;
pub mod config;
pub mod error;
pub mod handler;
pub mod model;
pub mod projection;
pub mod request;
pub mod response;
pub mod storefront;
pub mod upstream;

pub use config::ProxyConfig;
pub use error::ProxyError;
pub use handler::{MetafieldProxy, Route};
pub use request::{Method, ProxyRequest};
pub use response::ProxyResponse;
pub use upstream::{Upstream, UpstreamMethod, UpstreamRequest, UpstreamResponse};

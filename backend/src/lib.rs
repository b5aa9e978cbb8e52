//! Foodgram backend library: recipe sharing over a token-authenticated REST
//! API.
//!
//! - [`domain`]: entities, validation, permissions, services and ports.
//! - [`inbound`]: the Actix Web adapter.
//! - [`outbound`]: PostgreSQL, media, PDF and password hashing adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(feature = "test-support")]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;

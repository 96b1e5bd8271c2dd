//! Forgery: a small user-account REST service.
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`]: user types, the error catalog, credential schemes, the
//!   account use-cases and the `UserStore` port.
//! - [`inbound`]: actix-web handlers and the error envelope renderer.
//! - [`outbound`]: the in-memory `UserStore` adapter.
//! - [`middleware`]: request tracing, timeout and authentication hooks.
//! - [`server`]: settings and application assembly.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;

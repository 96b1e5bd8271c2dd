//! Request middleware.
//!
//! Purpose: request lifecycle concerns that sit around every handler: trace
//! identifiers, time budgets and the authentication hook.

pub mod auth;
pub mod timeout;
pub mod trace;

pub use auth::{Authenticate, Authenticator, PermissiveAuthenticator};
pub use timeout::RequestTimeout;
pub use trace::{Trace, TraceId};

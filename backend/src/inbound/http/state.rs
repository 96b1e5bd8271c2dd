//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data`, so they depend only
//! on the account use-cases and stay testable without a running server.

use std::sync::Arc;

use crate::domain::UserAccountService;
use crate::domain::ports::UserStore;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Account registration and lookup.
    pub accounts: Arc<UserAccountService>,
}

impl HttpState {
    /// Build state around an existing account service.
    #[must_use]
    pub const fn new(accounts: Arc<UserAccountService>) -> Self {
        Self { accounts }
    }

    /// Build state whose account service is backed by `store`.
    #[must_use]
    pub fn from_store(store: Arc<dyn UserStore>) -> Self {
        Self::new(Arc::new(UserAccountService::new(store)))
    }
}

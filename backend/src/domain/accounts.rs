//! User account use-cases: registration and lookup.
//!
//! The service turns store results into catalogued domain errors. Store
//! failures are logged with their internal code and never reach clients.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};

use crate::domain::ports::{UserStore, UserStoreError};
use crate::domain::{CatalogEntry, Error, Password, User, UserGuid, Username, catalog};

/// Registration and lookup of user accounts over a [`UserStore`].
///
/// Registration holds an async gate across the username check and the
/// create, so two concurrent requests for one username cannot both succeed.
pub struct UserAccountService {
    store: Arc<dyn UserStore>,
    registration_gate: Mutex<()>,
}

impl UserAccountService {
    /// Create a service backed by `store`.
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            registration_gate: Mutex::new(()),
        }
    }

    /// Register a new account.
    ///
    /// # Errors
    /// - [`catalog::USERS_CREATE_ALREADY_EXISTS`] when the username is taken;
    ///   nothing is written in that case.
    /// - [`catalog::USERS_CREATE_STORE_FAILURE`] when either store call fails.
    pub async fn register(&self, username: Username, password: Password) -> Result<UserGuid, Error> {
        let _gate = self.registration_gate.lock().await;

        let existing = self
            .store
            .get_user_by_username(&username)
            .await
            .map_err(|err| store_failure(catalog::USERS_CREATE_STORE_FAILURE, &err))?;
        if existing.is_some() {
            info!(
                %username,
                internal_code = catalog::USERS_CREATE_ALREADY_EXISTS.internal_code(),
                "username already taken"
            );
            return Err(catalog::USERS_CREATE_ALREADY_EXISTS.into());
        }

        let guid = self
            .store
            .create_user(&username, &password)
            .await
            .map_err(|err| store_failure(catalog::USERS_CREATE_STORE_FAILURE, &err))?;
        info!(user_guid = %guid, %username, "user created");
        Ok(guid)
    }

    /// Look up an account by identifier.
    ///
    /// # Errors
    /// - [`catalog::USERS_LOOKUP_NOT_FOUND`] when no user has `guid`.
    /// - [`catalog::USERS_LOOKUP_STORE_FAILURE`] when the store call fails.
    pub async fn lookup(&self, guid: &UserGuid) -> Result<User, Error> {
        self.store
            .get_user_by_guid(guid)
            .await
            .map_err(|err| store_failure(catalog::USERS_LOOKUP_STORE_FAILURE, &err))?
            .ok_or_else(|| catalog::USERS_LOOKUP_NOT_FOUND.into())
    }
}

fn store_failure(entry: CatalogEntry, err: &UserStoreError) -> Error {
    error!(
        internal_code = entry.internal_code(),
        error = %err,
        "user store failure"
    );
    entry.into()
}

//! In-memory `UserStore` adapter.
//!
//! Users live in a map keyed by identifier and credentials in a second map
//! keyed by username. One lock guards both maps so a user and its credential
//! always appear and disappear together. Nothing survives a restart.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::instrument;

use crate::domain::ports::{UserStore, UserStoreError};
use crate::domain::{
    CredentialScheme, Password, PlaintextScheme, SealedPassword, User, UserGuid, Username,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserGuid, User>,
    credentials: HashMap<Username, SealedPassword>,
}

/// Process-local user store.
#[derive(Debug)]
pub struct InMemoryUserStore {
    tables: RwLock<Tables>,
    scheme: Arc<dyn CredentialScheme>,
}

impl InMemoryUserStore {
    /// Create an empty store sealing passwords with `scheme`.
    #[must_use]
    pub fn new(scheme: Arc<dyn CredentialScheme>) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            scheme,
        }
    }

    /// Create an empty store that keeps passwords verbatim.
    #[must_use]
    pub fn with_plaintext_credentials() -> Self {
        Self::new(Arc::new(PlaintextScheme))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, UserStoreError> {
        self.tables
            .read()
            .map_err(|_| UserStoreError::query("user store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, UserStoreError> {
        self.tables
            .write()
            .map_err(|_| UserStoreError::query("user store lock poisoned"))
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::with_plaintext_credentials()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    #[instrument(name = "db.create_user", level = "debug", skip_all, fields(%username))]
    async fn create_user(
        &self,
        username: &Username,
        password: &Password,
    ) -> Result<UserGuid, UserStoreError> {
        let sealed = self.scheme.seal(password);
        let mut tables = self.write()?;
        let guid = loop {
            let candidate = UserGuid::generate();
            if !tables.users.contains_key(&candidate) {
                break candidate;
            }
        };
        tables
            .users
            .insert(guid.clone(), User::new(guid.clone(), username.clone()));
        tables.credentials.insert(username.clone(), sealed);
        Ok(guid)
    }

    #[instrument(name = "db.delete_user", level = "debug", skip_all, fields(%guid))]
    async fn delete_user(&self, guid: &UserGuid) -> Result<(), UserStoreError> {
        let mut tables = self.write()?;
        if let Some(user) = tables.users.remove(guid) {
            tables.credentials.remove(user.username());
        }
        Ok(())
    }

    #[instrument(name = "db.get_user_by_guid", level = "debug", skip_all, fields(%guid))]
    async fn get_user_by_guid(&self, guid: &UserGuid) -> Result<Option<User>, UserStoreError> {
        Ok(self.read()?.users.get(guid).cloned())
    }

    #[instrument(name = "db.get_user_by_username", level = "debug", skip_all, fields(%username))]
    async fn get_user_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserStoreError> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|user| user.username() == username)
            .cloned())
    }

    #[instrument(name = "db.validate_credentials", level = "debug", skip_all, fields(%username))]
    async fn validate_credentials(
        &self,
        username: &Username,
        password: &str,
    ) -> Result<bool, UserStoreError> {
        let tables = self.read()?;
        Ok(tables
            .credentials
            .get(username)
            .is_some_and(|sealed| self.scheme.verify(sealed, password)))
    }
}

//! Port abstraction for user storage adapters and their errors.
//!
//! The capability set mirrors what any backing store must offer: create,
//! delete, two lookups, and credential validation. Every operation is
//! fallible so a persistent adapter can report I/O failures without changing
//! callers.

use async_trait::async_trait;

use crate::domain::{Password, User, UserGuid, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user store adapters.
    pub enum UserStoreError {
        /// Store connection could not be established.
        Connection {
            /// Adapter-specific detail; logged, never shown to clients.
            message: String,
        } => "user store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query {
            /// Adapter-specific detail; logged, never shown to clients.
            message: String,
        } => "user store query failed: {message}",
    }
}

/// Storage capability for user accounts and their credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Store a new user and its credential, returning the issued identifier.
    ///
    /// No uniqueness check is made on `username`; callers serialise the
    /// check-then-create sequence themselves.
    async fn create_user(
        &self,
        username: &Username,
        password: &Password,
    ) -> Result<UserGuid, UserStoreError>;

    /// Remove a user and its credential. Unknown identifiers are a no-op.
    async fn delete_user(&self, guid: &UserGuid) -> Result<(), UserStoreError>;

    /// Fetch a user by identifier.
    async fn get_user_by_guid(&self, guid: &UserGuid) -> Result<Option<User>, UserStoreError>;

    /// Fetch a user by username.
    async fn get_user_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserStoreError>;

    /// Check a username/password pair against the stored credential.
    async fn validate_credentials(
        &self,
        username: &Username,
        password: &str,
    ) -> Result<bool, UserStoreError>;
}

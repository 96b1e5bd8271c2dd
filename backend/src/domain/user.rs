//! User data model.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Server-generated user identifier.
///
/// Newly issued identifiers are random UUID v4 strings. Lookups accept any
/// client-supplied string so unknown identifiers resolve to "not found"
/// rather than a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserGuid(String);

impl UserGuid {
    /// Issue a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for UserGuid {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for UserGuid {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<UserGuid> for String {
    fn from(value: UserGuid) -> Self {
        value.0
    }
}

impl AsRef<str> for UserGuid {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account username.
///
/// Stored exactly as supplied. Any string is accepted, the empty one included;
/// uniqueness is the only constraint and the store enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Wrap `username` without altering it.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    /// Borrow the username text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl From<String> for Username {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Username {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Caller-supplied password, wiped from memory on drop.
///
/// Kept exactly as the client sent it, whitespace and emptiness included.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Take ownership of `password`.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        Self(Zeroizing::new(password.into()))
    }

    /// Borrow the raw password for sealing or comparison.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Application user.
///
/// Credentials are stored separately and never travel with this record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    guid: UserGuid,
    username: Username,
}

impl User {
    /// Build a user from its parts.
    #[must_use]
    pub const fn new(guid: UserGuid, username: Username) -> Self {
        Self { guid, username }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn guid(&self) -> &UserGuid {
        &self.guid
    }

    /// Unique username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }
}

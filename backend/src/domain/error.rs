//! Domain-level error types.
//!
//! Every failure the service reports to a client is identified by a
//! [`CatalogEntry`]: a public [`ErrorCode`], an internal code naming the exact
//! failure site, and a static message. The entries themselves live in
//! [`catalog`]. Inbound adapters decide the transport status and envelope.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public, client-facing error code.
///
/// The set is closed: adapters never invent codes outside this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Something failed inside the service; details stay server-side.
    InternalServiceError,
    /// The request could not be understood.
    BadRequest,
    /// No user exists for the requested identifier.
    UserNotFound,
    /// Another account already uses the requested username.
    UsernameAlreadyExists,
}

impl ErrorCode {
    /// Wire representation of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InternalServiceError => "INTERNAL_SERVICE_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::UsernameAlreadyExists => "USERNAME_ALREADY_EXISTS",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the error catalog.
///
/// ## Invariants
/// - `internal_code` identifies a single failure site and is never shared
///   between entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    code: ErrorCode,
    internal_code: &'static str,
    message: &'static str,
}

impl CatalogEntry {
    const fn new(code: ErrorCode, internal_code: &'static str, message: &'static str) -> Self {
        Self {
            code,
            internal_code,
            message,
        }
    }

    /// Public error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Diagnostic code used for log correlation.
    #[must_use]
    pub const fn internal_code(&self) -> &'static str {
        self.internal_code
    }

    /// Static human-readable message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.message
    }
}

/// Static catalog of every failure site the service can report.
pub mod catalog {
    use super::{CatalogEntry, ErrorCode};

    /// Message shared by all internal failures.
    pub const MESSAGE_INTERNAL_SERVER_ERROR: &str = "internal server error";
    /// Message for malformed requests.
    pub const MESSAGE_BAD_REQUEST: &str = "bad request";
    /// Message for unknown user identifiers.
    pub const MESSAGE_USER_NOT_FOUND: &str = "user not found";
    /// Message for username conflicts.
    pub const MESSAGE_USERNAME_EXISTS: &str = "username already taken";

    /// The error envelope itself could not be encoded.
    pub const MARSHAL_FAILURE: CatalogEntry = CatalogEntry::new(
        ErrorCode::InternalServiceError,
        "FORGERY-0000",
        MESSAGE_INTERNAL_SERVER_ERROR,
    );
    /// The HTTP layer failed outside any handler.
    pub const FRAMEWORK_ERROR: CatalogEntry = CatalogEntry::new(
        ErrorCode::InternalServiceError,
        "FORGERY-0001",
        MESSAGE_INTERNAL_SERVER_ERROR,
    );
    /// The HTTP layer rejected the request body or parameters.
    pub const BAD_REQUEST: CatalogEntry =
        CatalogEntry::new(ErrorCode::BadRequest, "FORGERY-0002", MESSAGE_BAD_REQUEST);
    /// The user store failed while creating a user.
    pub const USERS_CREATE_STORE_FAILURE: CatalogEntry = CatalogEntry::new(
        ErrorCode::InternalServiceError,
        "FORGERY-0003",
        MESSAGE_INTERNAL_SERVER_ERROR,
    );
    /// Lookup found no user for the identifier.
    pub const USERS_LOOKUP_NOT_FOUND: CatalogEntry = CatalogEntry::new(
        ErrorCode::UserNotFound,
        "FORGERY-0004",
        MESSAGE_USER_NOT_FOUND,
    );
    /// Create found an existing user with the same username.
    pub const USERS_CREATE_ALREADY_EXISTS: CatalogEntry = CatalogEntry::new(
        ErrorCode::UsernameAlreadyExists,
        "FORGERY-0005",
        MESSAGE_USERNAME_EXISTS,
    );
    /// The user store failed while looking up a user.
    pub const USERS_LOOKUP_STORE_FAILURE: CatalogEntry = CatalogEntry::new(
        ErrorCode::InternalServiceError,
        "FORGERY-0006",
        MESSAGE_INTERNAL_SERVER_ERROR,
    );
    /// An application error without a catalog entry of its own.
    pub const UNCLASSIFIED: CatalogEntry = CatalogEntry::new(
        ErrorCode::InternalServiceError,
        "FORGERY-0007",
        MESSAGE_INTERNAL_SERVER_ERROR,
    );
    /// Every catalog entry, in internal-code order.
    pub const ALL: [CatalogEntry; 8] = [
        MARSHAL_FAILURE,
        FRAMEWORK_ERROR,
        BAD_REQUEST,
        USERS_CREATE_STORE_FAILURE,
        USERS_LOOKUP_NOT_FOUND,
        USERS_CREATE_ALREADY_EXISTS,
        USERS_LOOKUP_STORE_FAILURE,
        UNCLASSIFIED,
    ];
}

/// Domain error carrying a catalog triple.
///
/// Only [`Error::unclassified`] replaces the catalog message; every other
/// error is built from a [`CatalogEntry`] verbatim.
///
/// # Examples
/// ```
/// use forgery::domain::{Error, ErrorCode, catalog};
///
/// let err = Error::from(catalog::USERS_LOOKUP_NOT_FOUND);
/// assert_eq!(err.code(), ErrorCode::UserNotFound);
/// assert_eq!(err.internal_code(), "FORGERY-0004");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    internal_code: &'static str,
    message: Cow<'static, str>,
}

impl Error {
    /// Wrap an application failure that has no catalog entry, keeping its
    /// own diagnostic text as the message.
    #[must_use]
    pub fn unclassified(message: impl Into<String>) -> Self {
        Self {
            code: catalog::UNCLASSIFIED.code(),
            internal_code: catalog::UNCLASSIFIED.internal_code(),
            message: Cow::Owned(message.into()),
        }
    }

    /// Public error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Diagnostic code naming the failure site.
    #[must_use]
    pub const fn internal_code(&self) -> &'static str {
        self.internal_code
    }

    /// Human-readable message returned to clients.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<CatalogEntry> for Error {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            code: entry.code(),
            internal_code: entry.internal_code(),
            message: Cow::Borrowed(entry.message()),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

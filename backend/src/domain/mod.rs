//! Domain primitives, use-cases and ports.
//!
//! Purpose: define strongly typed user entities, the error catalog and the
//! account use-cases independently of HTTP. Adapters under `inbound` and
//! `outbound` depend on this module, never the other way round.
//!
//! Public surface:
//! - Error / ErrorCode / CatalogEntry / catalog: failure catalog.
//! - User / UserGuid / Username / Password: account identity.
//! - CredentialScheme and its implementations: password sealing.
//! - UserAccountService: registration and lookup.

pub mod accounts;
pub mod credentials;
pub mod error;
pub mod ports;
pub mod user;

pub use self::accounts::UserAccountService;
pub use self::credentials::{
    CredentialScheme, CredentialSchemeKind, PlaintextScheme, SaltedSha256Scheme, SealedPassword,
    UnknownCredentialScheme,
};
pub use self::error::{CatalogEntry, Error, ErrorCode, catalog};
pub use self::user::{Password, User, UserGuid, Username};

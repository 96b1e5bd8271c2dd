//! Password sealing and verification.
//!
//! Stores never compare raw passwords themselves; they hand the stored
//! [`SealedPassword`] and the candidate to a [`CredentialScheme`]. Swapping
//! the scheme changes how credentials are kept without touching call sites.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroizing;

use super::Password;

const SALT_LEN: usize = 16;
const SALT_SEPARATOR: char = '$';

/// Stored form of a password as produced by a [`CredentialScheme`].
#[derive(Clone, PartialEq, Eq)]
pub struct SealedPassword(Zeroizing<String>);

impl SealedPassword {
    fn new(value: String) -> Self {
        Self(Zeroizing::new(value))
    }

    fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SealedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SealedPassword(***)")
    }
}

/// Strategy for storing and checking passwords.
pub trait CredentialScheme: Send + Sync + fmt::Debug {
    /// Produce the stored form of `password`.
    fn seal(&self, password: &Password) -> SealedPassword;

    /// Return true when `candidate` matches the sealed password.
    fn verify(&self, sealed: &SealedPassword, candidate: &str) -> bool;
}

/// Keeps passwords verbatim and compares them exactly.
///
/// Unsuitable for real deployments. Select it with
/// `credential_scheme = "plaintext"`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextScheme;

impl CredentialScheme for PlaintextScheme {
    fn seal(&self, password: &Password) -> SealedPassword {
        SealedPassword::new(password.expose().to_owned())
    }

    fn verify(&self, sealed: &SealedPassword, candidate: &str) -> bool {
        constant_time_eq(sealed.as_str().as_bytes(), candidate.as_bytes())
    }
}

/// Stores `hex(salt)$hex(sha256(salt || password))` with a random 16-byte salt.
#[derive(Debug, Default, Clone, Copy)]
pub struct SaltedSha256Scheme;

impl SaltedSha256Scheme {
    fn digest(salt: &[u8], password: &str) -> String {
        let digest = Sha256::new()
            .chain_update(salt)
            .chain_update(password.as_bytes())
            .finalize();
        hex::encode(digest)
    }
}

impl CredentialScheme for SaltedSha256Scheme {
    fn seal(&self, password: &Password) -> SealedPassword {
        let salt: [u8; SALT_LEN] = rand::random();
        let digest = Self::digest(&salt, password.expose());
        SealedPassword::new(format!("{}{SALT_SEPARATOR}{digest}", hex::encode(salt)))
    }

    fn verify(&self, sealed: &SealedPassword, candidate: &str) -> bool {
        let Some((salt_hex, expected)) = sealed.as_str().split_once(SALT_SEPARATOR) else {
            return false;
        };
        let Ok(salt) = hex::decode(salt_hex) else {
            return false;
        };
        let actual = Self::digest(&salt, candidate);
        constant_time_eq(actual.as_bytes(), expected.as_bytes())
    }
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0_u8, |acc, (l, r)| acc | (l ^ r))
        == 0
}

/// Configurable choice of [`CredentialScheme`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSchemeKind {
    /// [`PlaintextScheme`].
    Plaintext,
    /// [`SaltedSha256Scheme`].
    #[default]
    SaltedSha256,
}

impl CredentialSchemeKind {
    /// Configuration name of the scheme.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plaintext => "plaintext",
            Self::SaltedSha256 => "salted-sha256",
        }
    }

    /// Instantiate the selected scheme.
    #[must_use]
    pub fn build(self) -> Arc<dyn CredentialScheme> {
        match self {
            Self::Plaintext => Arc::new(PlaintextScheme),
            Self::SaltedSha256 => Arc::new(SaltedSha256Scheme),
        }
    }
}

/// Raised when configuration names a scheme that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown credential scheme `{0}` (expected `plaintext` or `salted-sha256`)")]
pub struct UnknownCredentialScheme(pub String);

impl FromStr for CredentialSchemeKind {
    type Err = UnknownCredentialScheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plaintext" => Ok(Self::Plaintext),
            "salted-sha256" => Ok(Self::SaltedSha256),
            _ => Err(UnknownCredentialScheme(s.to_owned())),
        }
    }
}

//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `FORGERY_*` environment variables and config
//! files. Every field is optional; accessors fall back to the defaults below.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{CredentialSchemeKind, UnknownCredentialScheme};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LOG_LEVEL: &str = "debug";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration values controlling the HTTP listener and account storage.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FORGERY")]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_level: Option<String>,
    /// Per-request time budget in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Password sealing scheme: `plaintext` or `salted-sha256`.
    pub credential_scheme: Option<String>,
}

impl ServerSettings {
    /// Return the configured host, falling back to the loopback interface.
    #[must_use]
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Return the configured port, falling back to `8080`.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Return the configured log filter, falling back to `debug`.
    #[must_use]
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Return the per-request time budget, falling back to 30 seconds.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Return the configured credential scheme, falling back to salted SHA-256.
    ///
    /// # Errors
    /// Returns [`UnknownCredentialScheme`] when the configured name matches no
    /// scheme.
    pub fn credential_scheme(&self) -> Result<CredentialSchemeKind, UnknownCredentialScheme> {
        self.credential_scheme
            .as_deref()
            .map_or(Ok(CredentialSchemeKind::default()), str::parse)
    }
}

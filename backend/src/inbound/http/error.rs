//! HTTP error envelope and the failure rendering hook.
//!
//! Every error response body has the shape
//! `{"code":"..","internal_code":"..","message":".."}`. [`render_failure`]
//! decides the body and final status for any [`Failure`]; actix-web reaches
//! it through the [`ResponseError`] impl.

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError, web};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};
use utoipa::ToSchema;

use crate::domain::{CatalogEntry, Error, ErrorCode, catalog};

/// Body sent when the envelope itself cannot be encoded. Built from literals
/// only so producing it cannot fail.
pub const FALLBACK_BODY: &[u8] = br#"{"code":"INTERNAL_SERVICE_ERROR","internal_code":"FORGERY-0000","message":"internal server error"}"#;

/// JSON error envelope returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    /// Public error code.
    #[schema(example = "USER_NOT_FOUND")]
    pub code: ErrorCode,
    /// Failure-site code for log correlation.
    #[schema(example = "FORGERY-0004")]
    pub internal_code: String,
    /// Human-readable message.
    #[schema(example = "user not found")]
    pub message: String,
}

impl From<&Error> for ErrorEnvelope {
    fn from(error: &Error) -> Self {
        Self {
            code: error.code(),
            internal_code: error.internal_code().to_owned(),
            message: error.message().to_owned(),
        }
    }
}

impl From<CatalogEntry> for ErrorEnvelope {
    fn from(entry: CatalogEntry) -> Self {
        Self::from(&Error::from(entry))
    }
}

/// Anything that can end a request unsuccessfully.
#[derive(Debug, Error)]
pub enum Failure {
    /// A catalogued domain error answered with `status`.
    #[error("{error}")]
    Domain {
        /// Response status.
        status: StatusCode,
        /// Catalogued error rendered into the envelope.
        error: Error,
    },
    /// The request exceeded its time budget.
    #[error("request timed out")]
    Timeout {
        /// Response status, normally `408`.
        status: StatusCode,
    },
    /// The HTTP layer refused the request outside any handler.
    #[error("request rejected by the HTTP layer ({status})")]
    Framework {
        /// Status chosen by the refusing layer.
        status: StatusCode,
    },
    /// An application error without a catalog entry.
    #[error("{source}")]
    Untagged {
        /// Response status, normally `500`.
        status: StatusCode,
        /// Underlying error; its text becomes the envelope message.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Failure {
    /// Timeout failure with `408 Request Timeout`.
    #[must_use]
    pub const fn timeout() -> Self {
        Self::Timeout {
            status: StatusCode::REQUEST_TIMEOUT,
        }
    }

    /// Framework-level refusal with the given status.
    #[must_use]
    pub const fn framework(status: StatusCode) -> Self {
        Self::Framework { status }
    }

    /// Wrap an uncatalogued error, answered with `500`.
    #[must_use]
    pub fn untagged(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Untagged {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            source: source.into(),
        }
    }

    /// Status the failure was raised with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Domain { status, .. }
            | Self::Timeout { status }
            | Self::Framework { status }
            | Self::Untagged { status, .. } => *status,
        }
    }
}

/// Status a domain error is answered with when a handler does not choose one.
#[must_use]
pub const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InternalServiceError => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
        ErrorCode::UserNotFound => StatusCode::NOT_FOUND,
        ErrorCode::UsernameAlreadyExists => StatusCode::CONFLICT,
    }
}

impl From<Error> for Failure {
    fn from(error: Error) -> Self {
        Self::Domain {
            status: status_for(error.code()),
            error,
        }
    }
}

/// Outcome of [`render_failure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFailure {
    /// Final response status.
    pub status: StatusCode,
    /// Encoded envelope, or `None` for an empty body.
    pub body: Option<Vec<u8>>,
}

/// Render `failure` raised with `status` into a response status and body.
///
/// - Domain errors serialise their own catalog triple.
/// - Timeouts produce no body and keep `status`.
/// - Framework refusals with `400` use the bad-request entry; any other
///   framework refusal uses the generic framework entry.
/// - Untagged errors keep their own text as the message.
/// - If encoding fails the literal [`FALLBACK_BODY`] is sent with `500`.
///
/// # Examples
/// ```
/// use actix_web::http::StatusCode;
/// use forgery::domain::{Error, catalog};
/// use forgery::inbound::http::error::{Failure, render_failure};
///
/// let failure = Failure::from(Error::from(catalog::USERS_LOOKUP_NOT_FOUND));
/// let rendered = render_failure(StatusCode::NOT_FOUND, &failure);
/// assert_eq!(
///     rendered.body.as_deref(),
///     Some(br#"{"code":"USER_NOT_FOUND","internal_code":"FORGERY-0004","message":"user not found"}"#.as_slice())
/// );
/// ```
#[must_use]
pub fn render_failure(status: StatusCode, failure: &Failure) -> RenderedFailure {
    render_with(status, failure, |envelope| serde_json::to_vec(envelope))
}

pub(crate) fn render_with<F>(status: StatusCode, failure: &Failure, encode: F) -> RenderedFailure
where
    F: FnOnce(&ErrorEnvelope) -> serde_json::Result<Vec<u8>>,
{
    let envelope = match failure {
        Failure::Timeout { .. } => return RenderedFailure { status, body: None },
        Failure::Framework { .. } if status == StatusCode::BAD_REQUEST => {
            ErrorEnvelope::from(catalog::BAD_REQUEST)
        }
        Failure::Framework { .. } => ErrorEnvelope::from(catalog::FRAMEWORK_ERROR),
        Failure::Domain { error, .. } => ErrorEnvelope::from(error),
        Failure::Untagged { source, .. } => {
            ErrorEnvelope::from(&Error::unclassified(source.to_string()))
        }
    };

    match encode(&envelope) {
        Ok(body) => RenderedFailure {
            status,
            body: Some(body),
        },
        Err(err) => {
            error!(
                internal_code = catalog::MARSHAL_FAILURE.internal_code(),
                error = %err,
                "failed to encode error envelope"
            );
            RenderedFailure {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: Some(FALLBACK_BODY.to_vec()),
            }
        }
    }
}

impl ResponseError for Failure {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let RenderedFailure { status, body } = render_failure(self.status(), self);
        debug!(status = status.as_u16(), failure = %self, "rendering error response");
        let Some(bytes) = body else {
            return HttpResponse::build(status).finish();
        };
        HttpResponse::build(status)
            .content_type(ContentType::json())
            .body(bytes)
    }
}

/// JSON extractor configuration routing body errors into the framework
/// bad-request path.
///
/// Malformed, truncated or mistyped bodies all answer `400` with the
/// bad-request envelope; the extractor's own error text is only logged.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        warn!(
            internal_code = catalog::BAD_REQUEST.internal_code(),
            path = req.path(),
            error = %err,
            "rejected request body"
        );
        Failure::framework(StatusCode::BAD_REQUEST).into()
    })
}

/// Convenience alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Failure>;

#[cfg(test)]
mod tests;

//! Authentication hook for the versioned API.
//!
//! An [`Authenticator`] inspects request headers before any handler runs.
//! Rejections surface as framework failures carrying the authenticator's
//! status, so they share the standard error envelope.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::http::header::HeaderMap;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::warn;

use crate::inbound::http::error::Failure;

/// Decides whether a request may proceed.
pub trait Authenticator: Send + Sync {
    /// Inspect `headers`; return the status to reject with, if any.
    ///
    /// # Errors
    /// Returns the HTTP status the request should be refused with.
    fn authenticate(&self, headers: &HeaderMap) -> Result<(), StatusCode>;
}

/// Authenticator that lets every request through.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveAuthenticator;

impl Authenticator for PermissiveAuthenticator {
    fn authenticate(&self, _headers: &HeaderMap) -> Result<(), StatusCode> {
        Ok(())
    }
}

/// Middleware running an [`Authenticator`] ahead of the wrapped services.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use forgery::middleware::Authenticate;
///
/// let app = App::new().service(web::scope("/v1").wrap(Authenticate::permissive()));
/// ```
#[derive(Clone)]
pub struct Authenticate {
    authenticator: Arc<dyn Authenticator>,
}

impl Authenticate {
    /// Guard requests with `authenticator`.
    #[must_use]
    pub const fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self { authenticator }
    }

    /// Guard that admits every request.
    #[must_use]
    pub fn permissive() -> Self {
        Self::new(Arc::new(PermissiveAuthenticator))
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authenticate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticateMiddleware {
            service,
            authenticator: Arc::clone(&self.authenticator),
        }))
    }
}

/// Service wrapper produced by [`Authenticate`].
pub struct AuthenticateMiddleware<S> {
    service: S,
    authenticator: Arc<dyn Authenticator>,
}

impl<S, B> Service<ServiceRequest> for AuthenticateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Err(status) = self.authenticator.authenticate(req.headers()) {
            warn!(status = status.as_u16(), path = req.path(), "request refused by authenticator");
            let res = req.error_response(Failure::framework(status));
            return Box::pin(ready(Ok(res)));
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_boxed_body) })
    }
}

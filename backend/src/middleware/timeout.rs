//! Request timeout middleware.
//!
//! Requests that run longer than the configured budget are abandoned. The
//! middleware yields a timeout [`Failure`], which actix renders as
//! `408 Request Timeout` with an empty body.

use std::task::{Context, Poll};
use std::time::Duration;

use actix_web::Error;
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::warn;

use crate::inbound::http::error::Failure;

/// Middleware bounding how long a request may run.
///
/// # Examples
/// ```
/// use std::time::Duration;
///
/// use actix_web::App;
/// use forgery::middleware::RequestTimeout;
///
/// let app = App::new().wrap(RequestTimeout::new(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequestTimeout {
    budget: Duration,
}

impl RequestTimeout {
    /// Abandon requests that take longer than `budget`.
    #[must_use]
    pub const fn new(budget: Duration) -> Self {
        Self { budget }
    }

    /// Configured time budget.
    #[must_use]
    pub const fn budget(&self) -> Duration {
        self.budget
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestTimeout
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTimeoutMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTimeoutMiddleware {
            service,
            budget: self.budget,
        }))
    }
}

/// Service wrapper produced by [`RequestTimeout`].
pub struct RequestTimeoutMiddleware<S> {
    service: S,
    budget: Duration,
}

impl<S, B> Service<ServiceRequest> for RequestTimeoutMiddleware<S>
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
        let path = req.path().to_owned();
        let budget = self.budget;
        let fut = self.service.call(req);

        Box::pin(async move {
            let Ok(outcome) = tokio::time::timeout(budget, fut).await else {
                warn!(
                    budget_ms = u64::try_from(budget.as_millis()).unwrap_or(u64::MAX),
                    path = %path,
                    "request timed out"
                );
                return Err(Failure::timeout().into());
            };
            outcome.map(ServiceResponse::map_into_boxed_body)
        })
    }
}

//! Server construction and middleware wiring.

mod config;

pub use config::ServerSettings;

use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, HttpServer, web};
use futures_util::future::{Ready, ready};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::{Failure, json_config};
use crate::inbound::http::login::login;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{create_user, lookup_user};
use crate::middleware::{Authenticate, Authenticator, RequestTimeout, Trace};
use crate::outbound::InMemoryUserStore;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything [`build_app`] needs to assemble one application instance.
#[derive(Clone)]
pub struct AppDependencies {
    /// Handler state shared by every worker.
    pub http_state: web::Data<HttpState>,
    /// Authentication hook guarding `/v1`.
    pub authenticate: Authenticate,
    /// Per-request time budget.
    pub request_timeout: Duration,
}

impl AppDependencies {
    /// Dependencies with a permissive authenticator and a 30 second budget.
    #[must_use]
    pub fn new(http_state: web::Data<HttpState>) -> Self {
        Self {
            http_state,
            authenticate: Authenticate::permissive(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Replace the authentication hook.
    #[must_use]
    pub fn with_authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticate = Authenticate::new(authenticator);
        self
    }

    /// Replace the per-request time budget.
    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

fn route_not_found() -> Ready<ApiResult<HttpResponse>> {
    ready(Err(Failure::framework(StatusCode::NOT_FOUND)))
}

#[cfg(debug_assertions)]
fn mount_docs(cfg: &mut web::ServiceConfig) {
    cfg.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
}

#[cfg(not(debug_assertions))]
const fn mount_docs(_cfg: &mut web::ServiceConfig) {}

/// Assemble the application: `/v1` routes behind the auth hook, the request
/// timeout and tracing middleware, and the framework 404 for unknown paths.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use actix_web::web;
/// use forgery::inbound::http::state::HttpState;
/// use forgery::outbound::InMemoryUserStore;
/// use forgery::server::{AppDependencies, build_app};
///
/// let state = HttpState::from_store(Arc::new(InMemoryUserStore::default()));
/// let _app = build_app(AppDependencies::new(web::Data::new(state)));
/// ```
#[must_use]
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        authenticate,
        request_timeout,
    } = deps;

    let api = web::scope("/v1")
        .wrap(authenticate)
        .service(login)
        .service(create_user)
        .service(lookup_user);

    App::new()
        .app_data(http_state)
        .app_data(json_config())
        .service(api)
        .configure(mount_docs)
        .default_service(web::to(route_not_found))
        .wrap(RequestTimeout::new(request_timeout))
        .wrap(Trace)
}

/// Construct the HTTP server described by `settings`.
///
/// The user store is created here, once, and shared by every worker.
///
/// # Errors
/// Returns [`std::io::Error`] when the credential scheme is unknown or the
/// socket cannot be bound.
pub fn create_server(settings: &ServerSettings) -> std::io::Result<Server> {
    let scheme = settings.credential_scheme().map_err(std::io::Error::other)?;
    let store = Arc::new(InMemoryUserStore::new(scheme.build()));
    let http_state = web::Data::new(HttpState::from_store(store));
    let request_timeout = settings.request_timeout();

    info!(
        host = settings.host(),
        port = settings.port(),
        credential_scheme = scheme.as_str(),
        request_timeout_secs = request_timeout.as_secs(),
        "starting server"
    );

    let server = HttpServer::new(move || {
        build_app(
            AppDependencies::new(http_state.clone()).with_request_timeout(request_timeout),
        )
    })
    .bind((settings.host(), settings.port()))?
    .run();

    Ok(server)
}

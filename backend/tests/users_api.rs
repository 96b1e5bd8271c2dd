//! End-to-end behaviour of the assembled application.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::{CONTENT_TYPE, HeaderMap};
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use forgery::domain::ErrorCode;
use forgery::inbound::http::error::ErrorEnvelope;
use forgery::inbound::http::state::HttpState;
use forgery::inbound::http::users::{CreateUserResponse, UserResponse};
use forgery::middleware::Authenticator;
use forgery::middleware::trace::TRACE_ID_HEADER;
use forgery::outbound::InMemoryUserStore;
use forgery::server::{AppDependencies, build_app};
use futures::future::join_all;
use rstest::rstest;
use serde_json::json;

fn deps() -> AppDependencies {
    let state = HttpState::from_store(Arc::new(InMemoryUserStore::default()));
    AppDependencies::new(web::Data::new(state))
}

fn app(
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
    build_app(deps)
}

fn create(username: &str, password: &str) -> TestRequest {
    TestRequest::post()
        .uri("/v1/users")
        .set_json(json!({"username": username, "password": password}))
}

#[actix_web::test]
async fn registered_users_are_returned_by_lookup() {
    let app = test::init_service(app(deps())).await;

    let create_res = test::call_service(&app, create("you", "password").to_request()).await;
    assert_eq!(create_res.status(), StatusCode::CREATED);
    let created: CreateUserResponse = test::read_body_json(create_res).await;
    assert!(!created.user_guid.is_empty());

    let lookup_res = test::call_service(
        &app,
        TestRequest::get()
            .uri(&format!("/v1/users/{}", created.user_guid))
            .to_request(),
    )
    .await;
    assert_eq!(lookup_res.status(), StatusCode::OK);
    let user: UserResponse = test::read_body_json(lookup_res).await;
    assert_eq!(user.user_guid, created.user_guid);
    assert_eq!(user.username, "you");
}

#[actix_web::test]
async fn duplicate_registration_conflicts_and_unknown_users_are_missing() {
    let app = test::init_service(app(deps())).await;

    let first = test::call_service(&app, create("me", "password").to_request()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = test::call_service(&app, create("me", "password").to_request()).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let conflict: ErrorEnvelope = test::read_body_json(second).await;
    assert_eq!(conflict.code, ErrorCode::UsernameAlreadyExists);
    assert_eq!(conflict.internal_code, "FORGERY-0005");
    assert_eq!(conflict.message, "username already taken");

    let missing = test::call_service(
        &app,
        TestRequest::get().uri("/v1/users/not_here").to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let not_found: ErrorEnvelope = test::read_body_json(missing).await;
    assert_eq!(not_found.code, ErrorCode::UserNotFound);
    assert_eq!(not_found.internal_code, "FORGERY-0004");
}

#[actix_web::test]
async fn empty_username_and_password_register() {
    let app = test::init_service(app(deps())).await;

    let res = test::call_service(&app, create("", "").to_request()).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: CreateUserResponse = test::read_body_json(res).await;
    assert!(uuid::Uuid::parse_str(&created.user_guid).is_ok());

    let again = test::call_service(&app, create("", "other").to_request()).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
}

#[rstest]
#[case::login(TestRequest::post().uri("/v1/login"), StatusCode::OK)]
#[case::create(create("stacked", "password"), StatusCode::CREATED)]
#[case::lookup(TestRequest::get().uri("/v1/users/not_here"), StatusCode::NOT_FOUND)]
#[case::bad_body(
    TestRequest::post()
        .uri("/v1/users")
        .insert_header((CONTENT_TYPE, "application/json"))
        .set_payload("{"),
    StatusCode::BAD_REQUEST
)]
#[case::unrouted(TestRequest::get().uri("/nowhere"), StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn every_route_runs_through_the_full_middleware_stack(
    #[case] request: TestRequest,
    #[case] expected: StatusCode,
) {
    let app = test::init_service(app(deps())).await;

    let outcome = test::try_call_service(&app, request.to_request()).await;
    let Ok(res) = outcome else {
        panic!("request should produce a response");
    };
    assert_eq!(res.status(), expected);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
}

#[rstest]
#[case::collection_get(TestRequest::get().uri("/v1/users"))]
#[case::login_get(TestRequest::get().uri("/v1/login"))]
#[case::lookup_post(TestRequest::post().uri("/v1/users/some-guid"))]
#[actix_web::test]
async fn method_mismatches_fall_through_to_the_framework_404(#[case] request: TestRequest) {
    let app = test::init_service(app(deps())).await;

    let res = test::call_service(&app, request.to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let envelope: ErrorEnvelope = test::read_body_json(res).await;
    assert_eq!(envelope.code, ErrorCode::InternalServiceError);
    assert_eq!(envelope.internal_code, "FORGERY-0001");
}

#[actix_web::test]
async fn concurrent_registrations_create_one_account() {
    let app = test::init_service(app(deps())).await;

    let responses = join_all(
        (0..8).map(|_| test::call_service(&app, create("racer", "password").to_request())),
    )
    .await;

    let statuses: Vec<StatusCode> = responses.iter().map(ServiceResponse::status).collect();
    let created = statuses
        .iter()
        .filter(|status| **status == StatusCode::CREATED)
        .count();
    let conflicts = statuses
        .iter()
        .filter(|status| **status == StatusCode::CONFLICT)
        .count();
    assert_eq!((created, conflicts), (1, 7));
}

#[actix_web::test]
async fn login_is_acknowledged_with_an_empty_body() {
    let app = test::init_service(app(deps())).await;

    let res = test::call_service(&app, TestRequest::post().uri("/v1/login").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(test::read_body(res).await.is_empty());
}

#[rstest]
#[case::malformed("{\"username\": \"me\", ")]
#[case::not_an_object("[1, 2, 3]")]
#[case::empty("")]
#[actix_web::test]
async fn undecodable_bodies_use_the_bad_request_entry(#[case] body: &'static str) {
    let app = test::init_service(app(deps())).await;

    let res = test::call_service(
        &app,
        TestRequest::post()
            .uri("/v1/users")
            .insert_header((CONTENT_TYPE, "application/json"))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let envelope: ErrorEnvelope = test::read_body_json(res).await;
    assert_eq!(envelope.code, ErrorCode::BadRequest);
    assert_eq!(envelope.internal_code, "FORGERY-0002");
    assert_eq!(envelope.message, "bad request");
}

#[actix_web::test]
async fn unknown_routes_use_the_framework_entry() {
    let app = test::init_service(app(deps())).await;

    let res = test::call_service(&app, TestRequest::get().uri("/nowhere").to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    let envelope: ErrorEnvelope = test::read_body_json(res).await;
    assert_eq!(envelope.code, ErrorCode::InternalServiceError);
    assert_eq!(envelope.internal_code, "FORGERY-0001");
    assert_eq!(envelope.message, "internal server error");
}

#[actix_web::test]
async fn every_response_carries_a_trace_id() {
    let app = test::init_service(app(deps())).await;

    let created = test::call_service(&app, create("traced", "pw").to_request()).await;
    let missing = test::call_service(
        &app,
        TestRequest::get().uri("/v1/users/not_here").to_request(),
    )
    .await;

    for res in [created, missing] {
        let value = res
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .expect("trace id header");
        assert!(uuid::Uuid::parse_str(value).is_ok());
    }
}

struct DenyAll;

impl Authenticator for DenyAll {
    fn authenticate(&self, _headers: &HeaderMap) -> Result<(), StatusCode> {
        Err(StatusCode::UNAUTHORIZED)
    }
}

#[actix_web::test]
async fn authenticator_rejections_render_the_envelope() {
    let app = test::init_service(app(deps().with_authenticator(Arc::new(DenyAll)))).await;

    let res = test::call_service(&app, create("me", "password").to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    let envelope: ErrorEnvelope = test::read_body_json(res).await;
    assert_eq!(envelope.internal_code, "FORGERY-0001");
}

#[cfg(debug_assertions)]
#[actix_web::test]
async fn openapi_document_is_served_in_debug_builds() {
    let app = test::init_service(app(deps())).await;

    let res = test::call_service(
        &app,
        TestRequest::get().uri("/api-docs/openapi.json").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let doc: serde_json::Value = test::read_body_json(res).await;
    assert!(doc.pointer("/paths/~1v1~1users").is_some());
}

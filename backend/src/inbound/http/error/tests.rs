//! Tests for failure rendering and the error envelope.

use actix_web::body::to_bytes;
use actix_web::http::header;
use insta::assert_snapshot;
use rstest::rstest;
use serde::ser::Error as _;

use super::*;

fn body_text(rendered: &RenderedFailure) -> String {
    let bytes = rendered.body.clone().expect("body present");
    String::from_utf8(bytes).expect("utf-8 body")
}

#[rstest]
fn domain_errors_render_their_catalog_triple() {
    let failure = Failure::from(Error::from(catalog::USERS_CREATE_ALREADY_EXISTS));
    let rendered = render_failure(StatusCode::CONFLICT, &failure);

    assert_eq!(rendered.status, StatusCode::CONFLICT);
    assert_snapshot!(body_text(&rendered), @r#"{"code":"USERNAME_ALREADY_EXISTS","internal_code":"FORGERY-0005","message":"username already taken"}"#);
}

#[rstest]
fn rendering_is_byte_identical_across_calls() {
    let failure = Failure::from(Error::from(catalog::USERS_LOOKUP_NOT_FOUND));
    let first = render_failure(StatusCode::NOT_FOUND, &failure);
    let second = render_failure(StatusCode::NOT_FOUND, &failure);
    assert_eq!(first, second);
}

#[rstest]
fn timeouts_render_no_body_and_keep_their_status() {
    let rendered = render_failure(StatusCode::REQUEST_TIMEOUT, &Failure::timeout());
    assert_eq!(
        rendered,
        RenderedFailure {
            status: StatusCode::REQUEST_TIMEOUT,
            body: None,
        }
    );
}

#[rstest]
#[case::bad_request(StatusCode::BAD_REQUEST, catalog::BAD_REQUEST)]
#[case::not_found(StatusCode::NOT_FOUND, catalog::FRAMEWORK_ERROR)]
#[case::unauthorised(StatusCode::UNAUTHORIZED, catalog::FRAMEWORK_ERROR)]
#[case::method_not_allowed(StatusCode::METHOD_NOT_ALLOWED, catalog::FRAMEWORK_ERROR)]
fn framework_refusals_pick_their_entry_by_status(
    #[case] status: StatusCode,
    #[case] entry: CatalogEntry,
) {
    let rendered = render_failure(status, &Failure::framework(status));

    assert_eq!(rendered.status, status);
    let envelope: ErrorEnvelope =
        serde_json::from_slice(rendered.body.as_deref().expect("body")).expect("envelope");
    assert_eq!(envelope, ErrorEnvelope::from(entry));
}

#[rstest]
fn untagged_errors_keep_their_own_text() {
    let failure = Failure::untagged("upstream exploded");
    let rendered = render_failure(StatusCode::INTERNAL_SERVER_ERROR, &failure);

    assert_eq!(rendered.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_snapshot!(body_text(&rendered), @r#"{"code":"INTERNAL_SERVICE_ERROR","internal_code":"FORGERY-0007","message":"upstream exploded"}"#);
}

#[rstest]
fn encoding_failures_fall_back_to_the_literal_body() {
    let failure = Failure::from(Error::from(catalog::USERS_LOOKUP_NOT_FOUND));
    let rendered = render_with(StatusCode::NOT_FOUND, &failure, |_| {
        Err(serde_json::Error::custom("boom"))
    });

    assert_eq!(rendered.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(rendered.body.as_deref(), Some(FALLBACK_BODY));
}

#[rstest]
fn fallback_body_matches_the_marshal_failure_entry() {
    let encoded =
        serde_json::to_vec(&ErrorEnvelope::from(catalog::MARSHAL_FAILURE)).expect("encodes");
    assert_eq!(encoded.as_slice(), FALLBACK_BODY);
}

#[rstest]
#[case::internal(ErrorCode::InternalServiceError, StatusCode::INTERNAL_SERVER_ERROR)]
#[case::bad_request(ErrorCode::BadRequest, StatusCode::BAD_REQUEST)]
#[case::not_found(ErrorCode::UserNotFound, StatusCode::NOT_FOUND)]
#[case::conflict(ErrorCode::UsernameAlreadyExists, StatusCode::CONFLICT)]
fn domain_codes_map_to_statuses(#[case] code: ErrorCode, #[case] status: StatusCode) {
    assert_eq!(status_for(code), status);
}

#[rstest]
#[actix_web::test]
async fn error_responses_carry_json_bodies() {
    let failure = Failure::from(Error::from(catalog::USERS_LOOKUP_NOT_FOUND));
    let response = failure.error_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("application/json")
    );
    let body = to_bytes(response.into_body()).await.expect("body bytes");
    let envelope: ErrorEnvelope = serde_json::from_slice(&body).expect("envelope");
    assert_eq!(envelope.code, ErrorCode::UserNotFound);
    assert_eq!(envelope.internal_code, "FORGERY-0004");
}

#[rstest]
#[actix_web::test]
async fn timeout_responses_are_empty() {
    let response = Failure::timeout().error_response();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    let body = to_bytes(response.into_body()).await.expect("body bytes");
    assert!(body.is_empty());
}

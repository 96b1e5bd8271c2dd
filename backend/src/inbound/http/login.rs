//! Login endpoint.
//!
//! ```text
//! POST /v1/login
//! ```
//!
//! Accepts any request and answers `200` with an empty body. No session or
//! token is issued.

use actix_web::{HttpResponse, post};

/// Acknowledge a login request.
#[utoipa::path(
    post,
    path = "/v1/login",
    responses((status = 200, description = "Login acknowledged")),
    tags = ["users"],
    operation_id = "login"
)]
#[post("/login")]
#[expect(
    clippy::unused_async,
    reason = "actix-web route macros only accept async handlers"
)]
pub async fn login() -> HttpResponse {
    HttpResponse::Ok().finish()
}

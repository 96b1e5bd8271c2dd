//! Users API handlers.
//!
//! ```text
//! POST /v1/users {"username":"me","password":"password"}
//! GET /v1/users/{user_guid}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Password, User, UserGuid, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /v1/users`.
///
/// Example JSON:
/// `{"username":"me","password":"password"}`
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    /// Desired username, stored verbatim.
    pub username: String,
    /// Initial password, stored verbatim.
    pub password: String,
}

/// Response body for a successful registration.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserResponse {
    /// Identifier issued to the new user.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_guid: String,
}

/// Public view of a user. Credentials are never included.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserResponse {
    /// User identifier.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_guid: String,
    /// Username as registered.
    #[schema(example = "me")]
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_guid: user.guid().as_str().to_owned(),
            username: user.username().as_str().to_owned(),
        }
    }
}

/// Register a new user.
///
/// Any decoded strings are accepted, empty ones included. The username must
/// be unused; uniqueness is checked and the user created under one
/// registration gate.
#[utoipa::path(
    post,
    path = "/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = CreateUserResponse),
        (status = 400, description = "Undecodable request body", body = ErrorEnvelope),
        (status = 409, description = "Username already taken", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let CreateUserRequest { username, password } = payload.into_inner();
    let guid = state
        .accounts
        .register(Username::new(username), Password::new(password))
        .await?;
    Ok(HttpResponse::Created().json(CreateUserResponse {
        user_guid: guid.into(),
    }))
}

/// Fetch a user by identifier.
///
/// Any identifier text is accepted; unknown identifiers answer `404`.
#[utoipa::path(
    get,
    path = "/v1/users/{user_guid}",
    params(("user_guid" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "lookupUser"
)]
#[get("/users/{user_guid}")]
pub async fn lookup_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let guid = UserGuid::from(path.into_inner());
    let user = state.accounts.lookup(&guid).await?;
    Ok(web::Json(UserResponse::from(user)))
}

//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/v1` endpoint plus the request, response and
//! error envelope schemas. Debug builds serve it through Swagger UI; the
//! `openapi-dump` binary prints it for external tooling.

use utoipa::OpenApi;

use crate::domain::ErrorCode;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::users::{CreateUserRequest, CreateUserResponse, UserResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Forgery user service API",
        description = "User registration and lookup with a uniform JSON error envelope."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::login::login,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::lookup_user,
    ),
    components(schemas(
        CreateUserRequest,
        CreateUserResponse,
        UserResponse,
        ErrorEnvelope,
        ErrorCode
    )),
    tags(
        (name = "users", description = "Operations related to users")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the registered paths and schema field structure.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/v1/login")]
    #[case("/v1/users")]
    #[case("/v1/users/{user_guid}")]
    fn registers_every_endpoint(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    #[case("ErrorEnvelope", &["code", "internal_code", "message"])]
    #[case("CreateUserRequest", &["username", "password"])]
    #[case("CreateUserResponse", &["user_guid"])]
    #[case("UserResponse", &["user_guid", "username"])]
    fn schemas_expose_their_fields(#[case] name: &str, #[case] fields: &[&str]) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(name).expect("schema registered");
        for field in fields {
            assert_object_schema_has_field(schema, field);
        }
    }

    #[rstest]
    fn user_view_never_documents_credentials() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get("UserResponse").expect("schema registered") {
            RefOr::T(Schema::Object(obj)) => assert!(!obj.properties.contains_key("password")),
            _ => panic!("expected Object schema"),
        }
    }
}

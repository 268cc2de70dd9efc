//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: the user registration/lookup endpoints, the health
//! probes, and the shared error schema. The generated specification backs
//! Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, RoleName, User};
use crate::inbound::http::users::{RegisterUserRequest, RegisterUserResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Identity record service API",
        description = "Transactional user registration and point lookups by identifier."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        RoleName,
        Error,
        ErrorCode,
        RegisterUserRequest,
        RegisterUserResponse
    )),
    tags(
        (name = "users", description = "Registration and lookup of identity records"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

//! Users API handlers.
//!
//! ```text
//! POST /api/v1/users {"name":"Ada Lovelace","email":"ada@example.com",
//!                     "secret":"s3cret","secretConfirm":"s3cret"}
//! GET /api/v1/users/{id}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::credential::CredentialValidationError;
use crate::domain::{
    Error, Registration, RegistrationValidationError, User, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/v1/users`.
///
/// `role` is optional and defaults to the standard role; it must name an
/// allow-listed role when present.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    /// Registered name.
    pub name: String,
    /// Email address; must be unique across all records.
    pub email: String,
    /// Optional allow-listed role name.
    #[serde(default)]
    pub role: Option<String>,
    /// Plaintext secret. Never stored, never echoed.
    pub secret: String,
    /// Confirmation of the secret; must match exactly.
    pub secret_confirm: String,
}

impl TryFrom<RegisterUserRequest> for Registration {
    type Error = RegistrationValidationError;

    fn try_from(value: RegisterUserRequest) -> Result<Self, Self::Error> {
        Registration::try_from_parts(
            value.name,
            value.email,
            value.role.as_deref(),
            value.secret,
            value.secret_confirm,
        )
    }
}

/// Response body for a successful registration: the generated identifier
/// and nothing else.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserResponse {
    /// UUID assigned to the new record.
    pub id: String,
}

/// Register a new identity record.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "Record created", body = RegisterUserResponse),
        (status = 400, description = "Invalid registration", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterUserRequest>,
) -> ApiResult<HttpResponse> {
    let registration =
        Registration::try_from(payload.into_inner()).map_err(map_registration_validation_error)?;
    let id = state.identity.create(registration).await?;
    Ok(HttpResponse::Created().json(RegisterUserResponse { id: id.to_string() }))
}

/// Fetch an identity record by id.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier (UUID)")),
    responses(
        (status = 200, description = "Record found", body = User),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 404, description = "No such record", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let user = state.identity.get(path.as_str()).await?;
    Ok(web::Json(user))
}

fn map_registration_validation_error(err: RegistrationValidationError) -> Error {
    let (field, code) = match &err {
        RegistrationValidationError::User(user_err) => match user_err {
            UserValidationError::EmptyName | UserValidationError::NameTooLong { .. } => {
                ("name", "invalid_name")
            }
            UserValidationError::EmptyEmail
            | UserValidationError::InvalidEmail
            | UserValidationError::EmailTooLong { .. } => ("email", "invalid_email"),
            UserValidationError::UnknownRole { .. } => ("role", "unknown_role"),
            UserValidationError::EmptyId | UserValidationError::InvalidId => ("id", "malformed_id"),
        },
        RegistrationValidationError::Credential(cred_err) => match cred_err {
            CredentialValidationError::EmptySecret => ("secret", "empty_secret"),
            CredentialValidationError::EmptyDigest => ("secret", "invalid_secret"),
        },
    };
    Error::invalid_argument(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

//! Identity orchestration: the Create and Get workflows.
//!
//! [`IdentityService`] owns the state machine described by the service
//! contract: validate → hash → persist-in-transaction for Create, and
//! parse → read → not-found mapping for Get. It is the only place where
//! port-level failures are translated into the API error taxonomy, so raw
//! storage and hashing errors never cross the service boundary.

use std::sync::Arc;

use serde_json::json;
use tracing::error;

use super::credential::{CredentialValidationError, Secret};
use super::error::Error;
use super::ports::{CredentialHasher, IdentityPersistenceError, IdentityStore};
use super::user::{
    EmailAddress, NewUserRecord, RoleName, User, UserId, UserName, UserValidationError,
};

/// Validation errors for [`Registration::try_from_parts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// An identity field (name, email, role) failed validation.
    User(UserValidationError),
    /// The secret failed validation.
    Credential(CredentialValidationError),
}

impl std::fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(err) => err.fmt(f),
            Self::Credential(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

impl From<UserValidationError> for RegistrationValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::User(value)
    }
}

impl From<CredentialValidationError> for RegistrationValidationError {
    fn from(value: CredentialValidationError) -> Self {
        Self::Credential(value)
    }
}

/// Validated Create input.
///
/// Field-shape invariants hold once a value exists; the secret/confirmation
/// equality check is deliberately left to [`IdentityService::create`] so the
/// rejection happens before any hashing work.
#[derive(Debug)]
pub struct Registration {
    name: UserName,
    email: EmailAddress,
    role: RoleName,
    secret: Secret,
    secret_confirm: Secret,
}

impl Registration {
    /// Validate the individual registration fields.
    ///
    /// `role` falls back to [`RoleName::User`] when absent; unknown names
    /// are rejected against the allow-list before any storage contact.
    pub fn try_from_parts(
        name: impl Into<String>,
        email: impl Into<String>,
        role: Option<&str>,
        secret: impl Into<String>,
        secret_confirm: impl Into<String>,
    ) -> Result<Self, RegistrationValidationError> {
        let role = match role {
            Some(raw) => RoleName::parse(raw)?,
            None => RoleName::default(),
        };
        Ok(Self {
            name: UserName::new(name)?,
            email: EmailAddress::new(email)?,
            role,
            secret: Secret::new(secret)?,
            secret_confirm: Secret::new(secret_confirm)?,
        })
    }

    /// The plaintext secret, for hashing only.
    pub fn secret(&self) -> &Secret {
        &self.secret
    }

    /// Whether the secret and its confirmation agree.
    pub fn secret_matches_confirmation(&self) -> bool {
        self.secret.matches(&self.secret_confirm)
    }
}

/// Orchestrates validation, hashing, role resolution, and persistence.
#[derive(Clone)]
pub struct IdentityService {
    store: Arc<dyn IdentityStore>,
    hasher: Arc<dyn CredentialHasher>,
}

impl IdentityService {
    /// Wire the service to its driven ports.
    pub fn new(store: Arc<dyn IdentityStore>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { store, hasher }
    }

    /// Create a new identity record.
    ///
    /// Confirmation is checked before the expensive hash; the store performs
    /// role resolution and the insert inside a single transaction. Only the
    /// generated identifier is returned.
    pub async fn create(&self, registration: Registration) -> Result<UserId, Error> {
        if !registration.secret_matches_confirmation() {
            return Err(Error::invalid_argument("secret confirmation does not match")
                .with_details(json!({
                    "field": "secretConfirm",
                    "code": "confirmation_mismatch"
                })));
        }

        let credential = self
            .hasher
            .hash(registration.secret())
            .await
            .map_err(|err| {
                error!(error = %err, "credential hashing failed");
                Error::internal("credential hashing failed")
            })?;

        let Registration {
            name, email, role, ..
        } = registration;

        let stored = self
            .store
            .create(NewUserRecord {
                id: UserId::random(),
                name,
                email,
                role,
                credential,
            })
            .await
            .map_err(map_persistence_error)?;

        Ok(*stored.id())
    }

    /// Look up an identity record by its identifier.
    ///
    /// A malformed identifier never reaches the store; a missing row maps to
    /// `NotFound` with the requested id echoed back.
    pub async fn get(&self, raw_id: &str) -> Result<User, Error> {
        let id = UserId::new(raw_id).map_err(|_| {
            Error::invalid_argument(format!("malformed user id: {raw_id}")).with_details(json!({
                "field": "id",
                "code": "malformed_id"
            }))
        })?;

        let found = self
            .store
            .find_by_id(&id)
            .await
            .map_err(map_persistence_error)?;

        found.ok_or_else(|| Error::not_found(format!("user with id {id} not found")))
    }
}

fn map_persistence_error(error: IdentityPersistenceError) -> Error {
    match error {
        IdentityPersistenceError::DuplicateEmail { email } => {
            Error::already_exists(format!("email {email} is already registered"))
        }
        IdentityPersistenceError::RoleNotFound { role } => {
            // An allow-listed role missing from the table means broken
            // seeding, not caller error.
            error!(%role, "allow-listed role missing from the roles table");
            Error::internal(format!("role {role} could not be resolved"))
        }
        IdentityPersistenceError::Connection { message }
        | IdentityPersistenceError::Query { message }
        | IdentityPersistenceError::Timeout { message } => Error::internal(message),
    }
}

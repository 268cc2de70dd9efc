//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the relational store, the credential hasher). Each trait exposes
//! strongly typed errors so adapters map their failures into predictable
//! variants instead of returning a generic error.

use async_trait::async_trait;
use thiserror::Error;

use super::credential::{CredentialHash, Secret};
use super::user::{NewUserRecord, User, UserId};

/// Errors surfaced by credential hashing adapters.
///
/// Hashing fails only on catastrophic internal error (for example an
/// unavailable entropy source); callers treat every variant as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialHashError {
    /// The one-way function itself failed.
    #[error("credential hashing failed: {message}")]
    Hash { message: String },
}

impl CredentialHashError {
    /// Helper for hashing failures.
    pub fn hash(message: impl Into<String>) -> Self {
        Self::Hash {
            message: message.into(),
        }
    }
}

/// One-way, salted transformation of a plaintext secret.
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Derive a salted digest from the plaintext.
    async fn hash(&self, secret: &Secret) -> Result<CredentialHash, CredentialHashError>;

    /// Check a plaintext against a stored digest.
    async fn verify(
        &self,
        secret: &Secret,
        digest: &CredentialHash,
    ) -> Result<bool, CredentialHashError>;
}

/// Persistence errors raised by [`IdentityStore`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityPersistenceError {
    /// A pooled connection could not be obtained or was lost.
    #[error("identity store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("identity store query failed: {message}")]
    Query { message: String },
    /// The configured deadline expired before the operation finished; any
    /// in-flight transaction was rolled back.
    #[error("identity store deadline expired: {message}")]
    Timeout { message: String },
    /// The named role does not exist in the roles table.
    #[error("role {role} could not be resolved")]
    RoleNotFound { role: String },
    /// The email address is already bound to a record.
    #[error("email {email} is already registered")]
    DuplicateEmail { email: String },
}

impl IdentityPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for deadline expiry.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Helper for unresolved roles.
    pub fn role_not_found(role: impl Into<String>) -> Self {
        Self::RoleNotFound { role: role.into() }
    }

    /// Helper for email uniqueness violations.
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }
}

/// Persistence port owning atomic create and point-read of user records.
///
/// `create` must resolve the record's role and insert the row inside one
/// transaction: on any failure no partial row may become visible to other
/// transactions, and the transaction must be terminated on every exit path.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Atomically persist a new record and return it as stored.
    async fn create(&self, record: NewUserRecord) -> Result<User, IdentityPersistenceError>;

    /// Fetch a record by identifier; `None` means no row matched.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, IdentityPersistenceError>;
}

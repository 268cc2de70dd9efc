//! Domain primitives, ports, and the identity orchestration service.
//!
//! Purpose: define strongly typed domain entities used by the API and
//! persistence layers. Types are immutable and validate on construction;
//! serialisation contracts (serde) are documented on each type.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`] — API error payload and failure taxonomy.
//! - [`User`] / [`UserId`] — identity record and its identifier.
//! - [`Registration`] / [`IdentityService`] — the Create/Get workflows.
//! - [`ports`] — driven-side traits implemented by the outbound adapters.

pub mod credential;
pub mod error;
pub mod identity;
pub mod ports;
pub mod user;

pub use self::credential::{CredentialValidationError, Secret};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity::{IdentityService, Registration, RegistrationValidationError};
pub use self::user::{EmailAddress, RoleName, User, UserId, UserName, UserValidationError};

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, Error>;

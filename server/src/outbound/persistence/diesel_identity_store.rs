//! Diesel-backed [`IdentityStore`] adapter.
//!
//! `create` resolves the role id and inserts the user row inside a single
//! transaction scope: the transaction commits only when the closure returns
//! `Ok`, and rolls back on error or cancellation, so no partial row is ever
//! visible to other transactions. Both operations are bounded by the
//! configured deadline.

use std::time::Duration;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{IdentityPersistenceError, IdentityStore};
use crate::domain::user::{EmailAddress, NewUserRecord, RoleName, User, UserId, UserName};

use super::models::{InsertedUserRow, NewUserRow, UserWithRoleRow};
use super::pool::{DbPool, PoolError};
use super::schema::{roles, users};

/// PostgreSQL implementation of the identity store.
#[derive(Clone)]
pub struct DieselIdentityStore {
    pool: DbPool,
    deadline: Duration,
}

impl DieselIdentityStore {
    /// Create a new store over the given pool. `deadline` bounds each
    /// storage operation; expiry rolls back any in-flight transaction.
    pub const fn new(pool: DbPool, deadline: Duration) -> Self {
        Self { pool, deadline }
    }
}

/// Failures inside the creation transaction. Returning `Err` from the
/// transaction closure triggers the rollback.
enum TxFailure {
    RoleNotFound,
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for TxFailure {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

#[async_trait]
impl IdentityStore for DieselIdentityStore {
    async fn create(&self, record: NewUserRecord) -> Result<User, IdentityPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let record_ref = &record;

        let outcome = tokio::time::timeout(
            self.deadline,
            conn.transaction(|conn| {
                async move {
                    let role_id: Option<Uuid> = roles::table
                        .filter(roles::name.eq(record_ref.role.as_str()))
                        .select(roles::id)
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(role_id) = role_id else {
                        return Err(TxFailure::RoleNotFound);
                    };

                    let new_row = NewUserRow {
                        id: *record_ref.id.as_uuid(),
                        name: record_ref.name.as_ref(),
                        email: record_ref.email.as_ref(),
                        password_hash: record_ref.credential.as_str(),
                        role_id,
                    };
                    let inserted: InsertedUserRow = diesel::insert_into(users::table)
                        .values(&new_row)
                        .returning((
                            users::id,
                            users::name,
                            users::email,
                            users::created_at,
                            users::updated_at,
                        ))
                        .get_result(conn)
                        .await?;

                    Ok(inserted)
                }
                .scope_boxed()
            }),
        )
        .await;

        let inserted = match outcome {
            Err(_elapsed) => {
                return Err(IdentityPersistenceError::timeout(
                    "deadline expired before commit; transaction rolled back",
                ));
            }
            Ok(Ok(row)) => row,
            Ok(Err(TxFailure::RoleNotFound)) => {
                return Err(IdentityPersistenceError::role_not_found(
                    record.role.as_str(),
                ));
            }
            Ok(Err(TxFailure::Diesel(err))) => {
                return Err(map_create_error(err, record.email.as_ref()));
            }
        };

        inserted_to_user(inserted, record.role)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, IdentityPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = tokio::time::timeout(
            self.deadline,
            users::table
                .inner_join(roles::table)
                .filter(users::id.eq(*id.as_uuid()))
                .select((
                    users::id,
                    users::name,
                    users::email,
                    roles::name,
                    users::created_at,
                    users::updated_at,
                ))
                .first::<UserWithRoleRow>(&mut conn),
        )
        .await
        .map_err(|_elapsed| IdentityPersistenceError::timeout("deadline expired during read"))?
        .optional()
        .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }
}

/// Map pool errors to domain persistence errors.
fn map_pool_error(error: PoolError) -> IdentityPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } | PoolError::Ping { message } => {
            IdentityPersistenceError::connection(message)
        }
    }
}

/// Map insert failures, detecting the email uniqueness violation from the
/// structured error kind rather than message sniffing.
fn map_create_error(error: diesel::result::Error, email: &str) -> IdentityPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        debug!(message = info.message(), "unique constraint rejected insert");
        return IdentityPersistenceError::duplicate_email(email);
    }
    map_diesel_error(error)
}

/// Map Diesel errors to domain persistence errors.
fn map_diesel_error(error: diesel::result::Error) -> IdentityPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::NotFound => IdentityPersistenceError::query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            IdentityPersistenceError::connection(info.message().to_owned())
        }
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
            IdentityPersistenceError::query(info.message().to_owned())
        }
        other => IdentityPersistenceError::query(other.to_string()),
    }
}

fn map_row_validation(error: impl std::fmt::Display) -> IdentityPersistenceError {
    IdentityPersistenceError::query(format!("stored record failed validation: {error}"))
}

fn inserted_to_user(row: InsertedUserRow, role: RoleName) -> Result<User, IdentityPersistenceError> {
    Ok(User::new(
        UserId::from_uuid(row.id),
        UserName::new(row.name).map_err(map_row_validation)?,
        EmailAddress::new(row.email).map_err(map_row_validation)?,
        role,
        row.created_at,
        row.updated_at,
    ))
}

fn row_to_user(row: UserWithRoleRow) -> Result<User, IdentityPersistenceError> {
    Ok(User::new(
        UserId::from_uuid(row.id),
        UserName::new(row.name).map_err(map_row_validation)?,
        EmailAddress::new(row.email).map_err(map_row_validation)?,
        RoleName::parse(&row.role_name).map_err(map_row_validation)?,
        row.created_at,
        row.updated_at,
    ))
}

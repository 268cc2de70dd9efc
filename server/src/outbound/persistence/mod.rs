//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementation of the [`crate::domain::ports::IdentityStore`]
//! port backed by PostgreSQL via `diesel-async` with `bb8` connection
//! pooling.
//!
//! # Architecture
//!
//! - **Thin adapter**: the store only translates between Diesel rows and
//!   domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are implementation details, never exposed to
//!   the domain layer.
//! - **Strongly typed errors**: all database errors are mapped to
//!   [`crate::domain::ports::IdentityPersistenceError`] variants.

mod diesel_identity_store;
mod models;
mod pool;
mod schema;

pub use diesel_identity_store::DieselIdentityStore;
pub use pool::{DbPool, PoolConfig, PoolError};

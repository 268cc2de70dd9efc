//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation.

diesel::table! {
    /// Named authorization buckets. Seeded by migrations, read-only here.
    roles (id) {
        /// Primary key: UUID identifier.
        id -> Uuid,
        /// Unique role name ("admin", "user").
        name -> Varchar,
    }
}

diesel::table! {
    /// Identity records.
    users (id) {
        /// Primary key: UUID v4 identifier, generated by the service.
        id -> Uuid,
        /// Registered name (max 100 characters).
        name -> Varchar,
        /// Lowercase email address, unique across the table.
        email -> Varchar,
        /// bcrypt digest of the confirmed secret.
        password_hash -> Varchar,
        /// Foreign key into the roles table.
        role_id -> Uuid,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(users -> roles (role_id));

diesel::allow_tables_to_appear_in_same_query!(roles, users);

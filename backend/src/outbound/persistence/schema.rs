//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. `diesel
//! print-schema` against a migrated database regenerates them.

diesel::table! {
    /// Organizations owning zero or more users.
    organizations (org_id) {
        /// Primary key assigned by a `SERIAL` sequence.
        org_id -> Int4,
        /// Display name (max 255 characters).
        name -> Varchar,
        address -> Text,
        /// Record creation timestamp, defaulted by the database.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Users, each belonging to exactly one organization.
    users (user_id) {
        user_id -> Int4,
        name -> Varchar,
        /// Lower-cased address; unique across the table.
        email -> Varchar,
        /// `Admin` or `Member`, enforced by a check constraint.
        role -> Varchar,
        /// Foreign key to `organizations.org_id` with `ON DELETE RESTRICT`.
        org_id -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(users -> organizations (org_id));
diesel::allow_tables_to_appear_in_same_query!(organizations, users);

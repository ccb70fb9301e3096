// Postgres storage layer with sqlx
//
// This crate provides database implementations for the core store traits:
// - Database: implements UserStore and ReportStore over a PgPool
// plus the argon2 credential hasher used by both backends.

pub mod models;
pub mod password;
pub mod repositories;

pub use models::*;
pub use repositories::Database;

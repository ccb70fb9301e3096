// User account entity
//
// The password hash is opaque to everything but the credential hasher. It is
// redacted from Debug output and never serialized; the API layer exposes its
// own DTO without it.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A registered account. `email` is immutable after creation; `username` and
/// the password hash are mutable through profile updates.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Input for creating an account. The store assigns id and created_at.
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Mutable account fields. Absent fields are left untouched.
#[derive(Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub password_hash: Option<String>,
}

// Database models (internal, may differ from domain entities)

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use medassist_core::User;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ReportRow {
    pub user_id: Uuid,
    pub seq: i32,
    pub payload: sqlx::types::JsonValue,
}

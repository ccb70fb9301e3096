// Repository layer for database operations
//
// Assumed schema (provisioned externally):
//   users(id uuid PK, username text UNIQUE, email text UNIQUE,
//         password_hash text, created_at timestamptz)
//   reports(user_id uuid, seq int, payload jsonb, PRIMARY KEY (user_id, seq))

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;
use uuid::Uuid;

use medassist_core::{
    CoreError, NewUser, Report, ReportStore, Result, User, UserStore, UserUpdate,
};

use crate::models::{ReportRow, UserRow};

/// Attempts to win the per-user sequence race before giving up.
const SEQUENCE_RETRIES: usize = 3;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> AnyResult<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Fold a driver error into the core taxonomy; unique-index violations become
/// conflicts, everything else stays internal.
fn map_insert_error(err: sqlx::Error, conflict_msg: &str) -> CoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => CoreError::conflict(conflict_msg),
        _ => CoreError::Internal(err.into()),
    }
}

fn internal(err: sqlx::Error) -> CoreError {
    CoreError::Internal(err.into())
}

#[async_trait]
impl UserStore for Database {
    async fn insert(&self, user: NewUser) -> Result<User> {
        // The unique indexes on username and email make the check-and-insert
        // atomic: of two racing registrations exactly one row lands.
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| map_insert_error(err, "username or email already exists"))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal)?;

        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal)?;

        Ok(row.map(User::from))
    }

    async fn update(&self, id: Uuid, changes: UserUpdate) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET
                username = COALESCE($2, username),
                password_hash = COALESCE($3, password_hash)
            WHERE id = $1
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(id)
        .bind(&changes.username)
        .bind(&changes.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| map_insert_error(err, "username already exists"))?;

        row.map(User::from).ok_or(CoreError::NotFound)
    }
}

#[async_trait]
impl ReportStore for Database {
    async fn create(&self, user_id: Uuid, payload: Map<String, Value>) -> Result<Report> {
        let payload = Value::Object(payload);

        // Sequence assignment races with concurrent creates for the same
        // owner; the (user_id, seq) primary key rejects the loser, which
        // re-reads and retries.
        for _ in 0..SEQUENCE_RETRIES {
            let inserted = sqlx::query_as::<_, ReportRow>(
                r#"
                INSERT INTO reports (user_id, seq, payload)
                VALUES ($1, COALESCE((SELECT MAX(seq) + 1 FROM reports WHERE user_id = $1), 1), $2)
                RETURNING user_id, seq, payload
                "#,
            )
            .bind(user_id)
            .bind(&payload)
            .fetch_one(&self.pool)
            .await;

            match inserted {
                Ok(row) => return row_to_report(row),
                Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                    tracing::debug!(%user_id, "lost report sequence race, retrying");
                    continue;
                }
                Err(err) => return Err(internal(err)),
            }
        }

        Err(CoreError::internal(
            "could not assign a report sequence id under contention",
        ))
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<Report>> {
        let rows = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT user_id, seq, payload
            FROM reports
            WHERE user_id = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;

        rows.into_iter().map(row_to_report).collect()
    }
}

fn row_to_report(row: ReportRow) -> Result<Report> {
    let Value::Object(payload) = row.payload else {
        return Err(CoreError::internal(format!(
            "report ({}, {}) payload is not a JSON object",
            row.user_id, row.seq
        )));
    };
    Ok(Report {
        id: row.seq,
        user_id: row.user_id,
        payload,
    })
}

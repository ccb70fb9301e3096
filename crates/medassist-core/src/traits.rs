// Store traits for pluggable backends
//
// These traits allow the HTTP layer to be used with different backends:
// - In-memory implementations for tests and the no-database mode
// - Postgres implementations in medassist-storage for production

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::Result;
use crate::report::Report;
use crate::user::{NewUser, User, UserUpdate};

// ============================================================================
// UserStore - persistent account directory
// ============================================================================

/// Persistent store of accounts.
///
/// Implementations must make the uniqueness check and insert atomic: a race
/// between two inserts claiming the same username or email yields exactly one
/// success and one `CoreError::Conflict`, never two successes.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new account, assigning a fresh id and creation timestamp.
    async fn insert(&self, user: NewUser) -> Result<User>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Persist mutated fields for an existing id. Returns
    /// `CoreError::NotFound` when the id has no backing record and
    /// `CoreError::Conflict` when a username change collides with another
    /// account.
    async fn update(&self, id: Uuid, changes: UserUpdate) -> Result<User>;
}

// ============================================================================
// ReportStore - ownership-scoped report ledger
// ============================================================================

/// Ownership-scoped store of diagnosis reports.
///
/// Ids are per-owner insertion sequence numbers starting at 1; concurrent
/// creates for the same owner must never be assigned the same id. No
/// cross-owner read path exists.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Append a report to `user_id`'s collection, assigning the next sequence
    /// id. The payload must already be sanitized of reserved keys.
    async fn create(&self, user_id: Uuid, payload: Map<String, Value>) -> Result<Report>;

    /// Reports owned by `user_id`, in creation order.
    async fn list(&self, user_id: Uuid) -> Result<Vec<Report>>;
}

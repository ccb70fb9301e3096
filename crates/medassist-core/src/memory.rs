// In-memory store implementations
//
// Used by tests and by the server's no-database mode. The user map does its
// uniqueness check and insert under a single lock; the report ledger shards a
// lock per owner so unrelated users never serialize on each other.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::report::Report;
use crate::traits::{ReportStore, UserStore};
use crate::user::{NewUser, User, UserUpdate};

/// Account directory backed by a single map.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: NewUser) -> Result<User> {
        // Check-and-insert under one lock: racing registrations for the same
        // username or email cannot both pass the check.
        let mut users = self.users.lock().await;
        if users
            .values()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(CoreError::conflict("username or email already exists"));
        }
        let record = User {
            id: Uuid::now_v7(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update(&self, id: Uuid, changes: UserUpdate) -> Result<User> {
        let mut users = self.users.lock().await;
        if let Some(username) = &changes.username {
            if users.values().any(|u| u.id != id && u.username == *username) {
                return Err(CoreError::conflict("username already exists"));
            }
        }
        let user = users.get_mut(&id).ok_or(CoreError::NotFound)?;
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        Ok(user.clone())
    }
}

/// Report ledger with one lock shard per owner. The outer map lock is held
/// only long enough to resolve the shard, never across an append.
#[derive(Default)]
pub struct MemoryReportStore {
    shards: RwLock<HashMap<Uuid, Arc<Mutex<Vec<Report>>>>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn shard(&self, user_id: Uuid) -> Arc<Mutex<Vec<Report>>> {
        if let Some(shard) = self.shards.read().await.get(&user_id) {
            return shard.clone();
        }
        let mut shards = self.shards.write().await;
        shards
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(Vec::new())))
            .clone()
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn create(&self, user_id: Uuid, payload: Map<String, Value>) -> Result<Report> {
        let shard = self.shard(user_id).await;
        // Append-and-count under the owner's lock serializes id assignment.
        let mut reports = shard.lock().await;
        let report = Report {
            id: reports.len() as i32 + 1,
            user_id,
            payload,
        };
        reports.push(report.clone());
        Ok(report)
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<Report>> {
        let shard = self.shards.read().await.get(&user_id).cloned();
        match shard {
            Some(shard) => Ok(shard.lock().await.clone()),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    fn payload(symptom: &str) -> Map<String, Value> {
        let Value::Object(map) = json!({ "symptom": symptom }) else {
            unreachable!()
        };
        map
    }

    #[tokio::test]
    async fn insert_then_find_by_email() {
        let store = MemoryUserStore::new();
        let created = store.insert(new_user("alice", "alice@x.com")).await.unwrap();
        let found = store.find_by_email("alice@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.username, "alice");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryUserStore::new();
        store
            .insert(new_user("carol", "carol@x.com"))
            .await
            .unwrap();
        let err = store
            .insert(new_user("carol2", "carol@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let store = MemoryUserStore::new();
        store.insert(new_user("dave", "dave@x.com")).await.unwrap();
        let err = store
            .insert(new_user("dave", "dave2@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn racing_registrations_yield_one_success() {
        let store = Arc::new(MemoryUserStore::new());
        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .insert(new_user(&format!("user{i}"), "shared@x.com"))
                    .await
            }));
        }
        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(CoreError::Conflict(_)) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(conflicts, 7);
    }

    #[tokio::test]
    async fn update_renames_and_rehashes() {
        let store = MemoryUserStore::new();
        let user = store.insert(new_user("erin", "erin@x.com")).await.unwrap();
        let updated = store
            .update(
                user.id,
                UserUpdate {
                    username: Some("erin2".to_string()),
                    password_hash: Some("hash2".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.username, "erin2");
        assert_eq!(updated.password_hash, "hash2");
        // Email never changes through update
        assert_eq!(updated.email, "erin@x.com");
    }

    #[tokio::test]
    async fn update_missing_user_is_not_found() {
        let store = MemoryUserStore::new();
        let err = store
            .update(Uuid::now_v7(), UserUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound));
    }

    #[tokio::test]
    async fn rename_collision_conflicts() {
        let store = MemoryUserStore::new();
        store.insert(new_user("frank", "frank@x.com")).await.unwrap();
        let grace = store
            .insert(new_user("grace", "grace@x.com"))
            .await
            .unwrap();
        let err = store
            .update(
                grace.id,
                UserUpdate {
                    username: Some("frank".to_string()),
                    password_hash: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn reports_are_sequenced_per_owner() {
        let store = MemoryReportStore::new();
        let bob = Uuid::now_v7();
        let first = store.create(bob, payload("fever")).await.unwrap();
        let second = store.create(bob, payload("cough")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let listed = store.list(bob).await.unwrap();
        assert_eq!(
            listed.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[tokio::test]
    async fn reports_never_cross_owners() {
        let store = MemoryReportStore::new();
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        store.create(a, payload("fever")).await.unwrap();
        assert!(store.list(b).await.unwrap().is_empty());
        store.create(b, payload("headache")).await.unwrap();
        let a_reports = store.list(a).await.unwrap();
        assert_eq!(a_reports.len(), 1);
        assert!(a_reports.iter().all(|r| r.user_id == a));
    }

    #[tokio::test]
    async fn concurrent_creates_assign_distinct_ids() {
        let store = Arc::new(MemoryReportStore::new());
        let owner = Uuid::now_v7();
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.create(owner, payload(&format!("symptom{i}"))).await
            }));
        }
        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=32).collect::<Vec<_>>());
    }
}

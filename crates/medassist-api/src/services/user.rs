// User service: registration, authentication, profile mutation, bootstrap
// Decision: argon2 runs on the blocking pool; the hash cost must never stall
// the async runtime threads

use std::sync::Arc;

use uuid::Uuid;

use medassist_core::{CoreError, NewUser, Result, User, UserStore, UserUpdate};
use medassist_storage::password;

use crate::auth::config::AdminConfig;

/// Profile changes accepted from the caller. Renaming and password rotation
/// are independent of each other.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Register a new account with a freshly hashed password. Duplicate
    /// username or email surfaces as `CoreError::Conflict`.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        let password_hash = hash_blocking(password.to_string()).await?;
        self.store
            .insert(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await
    }

    /// Look up by email and verify the password. A lookup miss and a verify
    /// miss are indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let Some(user) = self.store.find_by_email(email).await? else {
            return Err(CoreError::AuthFailed);
        };
        let verified = verify_blocking(password.to_string(), user.password_hash.clone()).await?;
        if verified {
            Ok(user)
        } else {
            Err(CoreError::AuthFailed)
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<User>> {
        self.store.find_by_id(id).await
    }

    /// Apply profile changes. A password rotation requires the current
    /// password to verify first; a rename does not.
    pub async fn update_profile(&self, user_id: Uuid, changes: ProfileChanges) -> Result<User> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(CoreError::NotFound)?;

        let mut update = UserUpdate::default();

        if let Some(name) = changes.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(CoreError::validation("name must not be empty"));
            }
            update.username = Some(name);
        }

        match (changes.old_password, changes.new_password) {
            (Some(old), Some(new)) => {
                if new.is_empty() {
                    return Err(CoreError::validation("new password must not be empty"));
                }
                let verified = verify_blocking(old, user.password_hash.clone()).await?;
                if !verified {
                    return Err(CoreError::AuthFailed);
                }
                update.password_hash = Some(hash_blocking(new).await?);
            }
            (None, None) => {}
            _ => {
                return Err(CoreError::validation(
                    "both oldPassword and newPassword are required to change the password",
                ))
            }
        }

        if update.username.is_none() && update.password_hash.is_none() {
            return Ok(user);
        }
        self.store.update(user_id, update).await
    }

    /// Idempotently ensure the default admin account exists. Safe to call on
    /// every process start; a registration conflict means another instance
    /// won the race and is swallowed.
    pub async fn ensure_default_admin(&self, admin: &AdminConfig) -> Result<()> {
        if self.store.find_by_email(&admin.email).await?.is_some() {
            return Ok(());
        }
        match self
            .register(&admin.username, &admin.email, &admin.password)
            .await
        {
            Ok(user) => {
                tracing::info!(email = %admin.email, user_id = %user.id, "default admin created");
                Ok(())
            }
            Err(CoreError::Conflict(_)) => Ok(()),
            Err(err) => Err(err),
        }
    }
}

async fn hash_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || password::hash(&password))
        .await
        .map_err(|err| CoreError::Internal(err.into()))?
}

async fn verify_blocking(password: String, stored: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || password::verify(&password, &stored))
        .await
        .map_err(|err| CoreError::Internal(err.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use medassist_core::memory::MemoryUserStore;

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryUserStore::new()))
    }

    #[tokio::test]
    async fn register_then_authenticate() {
        let users = service();
        let created = users.register("alice", "alice@x.com", "pw1").await.unwrap();
        let authed = users.authenticate("alice@x.com", "pw1").await.unwrap();
        assert_eq!(authed.id, created.id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_fail_identically() {
        let users = service();
        users.register("alice", "alice@x.com", "pw1").await.unwrap();

        let wrong_pw = users
            .authenticate("alice@x.com", "wrongpw")
            .await
            .unwrap_err();
        let unknown = users
            .authenticate("nobody@x.com", "anything")
            .await
            .unwrap_err();
        assert!(matches!(wrong_pw, CoreError::AuthFailed));
        assert!(matches!(unknown, CoreError::AuthFailed));
    }

    #[tokio::test]
    async fn stored_hash_is_not_the_password() {
        let users = service();
        let user = users.register("bob", "bob@x.com", "pw1").await.unwrap();
        assert_ne!(user.password_hash, "pw1");
        assert!(user.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn rename_does_not_require_password() {
        let users = service();
        let user = users.register("carol", "carol@x.com", "pw1").await.unwrap();
        let updated = users
            .update_profile(
                user.id,
                ProfileChanges {
                    name: Some("caroline".to_string()),
                    ..ProfileChanges::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.username, "caroline");
        // Old password still works
        users.authenticate("carol@x.com", "pw1").await.unwrap();
    }

    #[tokio::test]
    async fn password_change_requires_correct_old_password() {
        let users = service();
        let user = users.register("dave", "dave@x.com", "pw1").await.unwrap();

        let err = users
            .update_profile(
                user.id,
                ProfileChanges {
                    old_password: Some("wrong".to_string()),
                    new_password: Some("pw2".to_string()),
                    ..ProfileChanges::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::AuthFailed));

        users
            .update_profile(
                user.id,
                ProfileChanges {
                    old_password: Some("pw1".to_string()),
                    new_password: Some("pw2".to_string()),
                    ..ProfileChanges::default()
                },
            )
            .await
            .unwrap();
        users.authenticate("dave@x.com", "pw2").await.unwrap();
        assert!(users.authenticate("dave@x.com", "pw1").await.is_err());
    }

    #[tokio::test]
    async fn half_a_password_change_is_a_validation_error() {
        let users = service();
        let user = users.register("erin", "erin@x.com", "pw1").await.unwrap();
        let err = users
            .update_profile(
                user.id,
                ProfileChanges {
                    new_password: Some("pw2".to_string()),
                    ..ProfileChanges::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let users = service();
        let admin = AdminConfig::default();
        users.ensure_default_admin(&admin).await.unwrap();
        users.ensure_default_admin(&admin).await.unwrap();

        let account = users
            .authenticate("admin@medical.com", "admin123")
            .await
            .unwrap();
        assert_eq!(account.username, "admin");
    }
}

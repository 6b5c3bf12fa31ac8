use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::userdb::errors::UserError;
use crate::userdb::types::User;

use super::UserRepository;

/// In-memory user repository, keyed by email.
///
/// Insert-if-absent happens under one lock, so it exhibits the same
/// conflict behavior a unique index gives the SQL backends.
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Number of stored rows.
    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.lock().await.is_empty()
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn init(&self) -> Result<(), UserError> {
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self.users.lock().await.get(email).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().await;
        if users.contains_key(&user.email) {
            return Err(UserError::Conflict(format!(
                "Email already exists: {}",
                user.email
            )));
        }
        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().await;
        if !users.contains_key(&user.email) {
            return Err(UserError::Storage(format!(
                "No such user to update: {}",
                user.email
            )));
        }
        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::userdb::types::AuthProvider;
    use chrono::Utc;

    fn user(email: &str) -> User {
        User {
            id: format!("id-{email}"),
            email: email.to_string(),
            display_name: "Test".to_string(),
            picture_url: None,
            provider: AuthProvider::Google,
            password_hash: None,
            created_at: Utc::now(),
            last_login_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryUserRepository::new();
        repo.insert(user("a@x.com")).await.unwrap();

        let found = repo.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, "id-a@x.com");
        assert!(repo.find_by_email("b@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_conflicts() {
        let repo = InMemoryUserRepository::new();
        repo.insert(user("a@x.com")).await.unwrap();

        let err = repo.insert(user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, UserError::Conflict(_)));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_missing_row_is_storage_error() {
        let repo = InMemoryUserRepository::new();
        let err = repo.update(user("ghost@x.com")).await.unwrap_err();
        assert!(matches!(err, UserError::Storage(_)));
    }
}

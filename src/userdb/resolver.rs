use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::oauth2::ExternalIdentity;

use super::errors::UserError;
use super::password::verify_password;
use super::store::UserRepository;
use super::types::{AuthProvider, User};

/// Maps verified external identities to local user records.
pub struct IdentityResolver {
    users: Arc<dyn UserRepository>,
}

impl IdentityResolver {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Find the user for a verified external identity, creating or updating
    /// the row as needed.
    ///
    /// A concurrent create for the same brand-new email loses the insert
    /// race with a unique-constraint conflict; the loser re-reads the row
    /// and applies its changes as an update instead of erroring.
    pub async fn resolve_or_create(&self, identity: &ExternalIdentity) -> Result<User, UserError> {
        if let Some(existing) = self.users.find_by_email(&identity.email).await? {
            return self.refresh(existing, identity).await;
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            picture_url: identity.picture_url.clone(),
            provider: AuthProvider::Google,
            password_hash: None,
            created_at: now,
            last_login_at: now,
        };

        match self.users.insert(user).await {
            Ok(created) => {
                tracing::info!(email = %created.email, "Created user on first external login");
                Ok(created)
            }
            Err(UserError::Conflict(_)) => {
                tracing::debug!(email = %identity.email, "Lost creation race, updating instead");
                let existing = self
                    .users
                    .find_by_email(&identity.email)
                    .await?
                    .ok_or_else(|| {
                        UserError::Storage(format!(
                            "User missing after unique conflict: {}",
                            identity.email
                        ))
                    })?;
                self.refresh(existing, identity).await
            }
            Err(e) => Err(e),
        }
    }

    /// Validate a password login. Only provider = local rows can match,
    /// whatever their stored hash; google rows never validate this way.
    pub async fn validate_local_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, UserError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Ok(None);
        };
        if user.provider != AuthProvider::Local {
            return Ok(None);
        }
        let Some(hash) = user.password_hash.clone() else {
            return Ok(None);
        };

        match verify_password(password, &hash) {
            Ok(true) => {}
            Ok(false) => return Ok(None),
            Err(e) => {
                // A row with a corrupt hash fails closed
                tracing::warn!(email, error = %e, "Stored password hash unusable");
                return Ok(None);
            }
        }

        let updated = User {
            last_login_at: Utc::now(),
            ..user
        };
        Ok(Some(self.users.update(updated).await?))
    }

    /// Look up a user by email without mutating it.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        self.users.find_by_email(email).await
    }

    async fn refresh(&self, existing: User, identity: &ExternalIdentity) -> Result<User, UserError> {
        let updated = User {
            display_name: identity.display_name.clone(),
            picture_url: identity.picture_url.clone(),
            provider: AuthProvider::Google,
            last_login_at: Utc::now(),
            ..existing
        };
        self.users.update(updated).await
    }
}

mod memory;
mod postgres;
mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;

use super::errors::UserError;
use super::types::{AuthProvider, User};

pub use memory::InMemoryUserRepository;
pub use postgres::PostgresUserRepository;
pub use sqlite::SqliteUserRepository;

pub(crate) const DB_TABLE_USERS: &str = "users";

/// Persistence collaborator for user records.
///
/// Email uniqueness is the repository's contract: `insert` must fail with
/// [`UserError::Conflict`] when another row already holds the email, so the
/// resolver can recover a creation race by re-reading and updating.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Prepare the backing store (create tables where applicable).
    async fn init(&self) -> Result<(), UserError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    async fn insert(&self, user: User) -> Result<User, UserError>;

    async fn update(&self, user: User) -> Result<User, UserError>;
}

/// Database row shape shared by the sqlx backends; `provider` stays TEXT in
/// the schema and is parsed on the way out.
#[derive(Debug, FromRow)]
pub(super) struct UserRow {
    pub(super) id: String,
    pub(super) email: String,
    pub(super) display_name: String,
    pub(super) picture_url: Option<String>,
    pub(super) provider: String,
    pub(super) password_hash: Option<String>,
    pub(super) created_at: DateTime<Utc>,
    pub(super) last_login_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            provider: AuthProvider::from_str(&row.provider)?,
            id: row.id,
            email: row.email,
            display_name: row.display_name,
            picture_url: row.picture_url,
            password_hash: row.password_hash,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
        })
    }
}

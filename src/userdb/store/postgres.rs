use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::userdb::errors::UserError;
use crate::userdb::types::User;

use super::{DB_TABLE_USERS, UserRepository, UserRow};

/// Postgres-backed user repository.
pub struct PostgresUserRepository {
    pool: Pool<Postgres>,
}

impl PostgresUserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn init(&self) -> Result<(), UserError> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {DB_TABLE_USERS} (
                id TEXT PRIMARY KEY NOT NULL,
                email TEXT NOT NULL UNIQUE,
                display_name TEXT NOT NULL,
                picture_url TEXT,
                provider TEXT NOT NULL,
                password_hash TEXT,
                created_at TIMESTAMPTZ NOT NULL,
                last_login_at TIMESTAMPTZ NOT NULL
            )
            "#
        ))
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::Storage(e.to_string()))?;

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT * FROM {DB_TABLE_USERS} WHERE email = $1
            "#
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::Storage(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn insert(&self, user: User) -> Result<User, UserError> {
        sqlx::query(&format!(
            r#"
            INSERT INTO {DB_TABLE_USERS}
                (id, email, display_name, picture_url, provider, password_hash, created_at, last_login_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#
        ))
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.picture_url)
        .bind(user.provider.as_str())
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.last_login_at)
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        sqlx::query(&format!(
            r#"
            UPDATE {DB_TABLE_USERS} SET
                email = $1,
                display_name = $2,
                picture_url = $3,
                provider = $4,
                password_hash = $5,
                last_login_at = $6
            WHERE id = $7
            "#
        ))
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.picture_url)
        .bind(user.provider.as_str())
        .bind(&user.password_hash)
        .bind(user.last_login_at)
        .bind(&user.id)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::Storage(e.to_string()))?;

        Ok(user)
    }
}

fn map_insert_error(e: sqlx::Error) -> UserError {
    match e.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => UserError::Conflict(db_err.to_string()),
        _ => UserError::Storage(e.to_string()),
    }
}

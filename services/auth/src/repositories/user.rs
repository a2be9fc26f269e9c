//! User repository for database operations

use async_trait::async_trait;
use common::error::{StoreError, StoreResult};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::{NewUser, User};

/// Storage operations on credential records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user; a taken handle yields `StoreError::Conflict`
    async fn insert(&self, new_user: &NewUser) -> StoreResult<User>;

    /// Find a user by public handle
    async fn get_by_handle(&self, username: &str) -> StoreResult<User>;

    /// Find a user by identity
    async fn get_by_id(&self, guid: Uuid) -> StoreResult<User>;

    /// Remove a user and, through the foreign key, their ads
    async fn delete(&self, guid: Uuid) -> StoreResult<()>;
}

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn insert(&self, new_user: &NewUser) -> StoreResult<User> {
        info!("Creating new user: {}", new_user.username);

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (guid, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING guid, username, password_hash, created_at
            "#,
        )
        .bind(new_user.guid)
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_by_handle(&self, username: &str) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT guid, username, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or(StoreError::NotFound)
    }

    async fn get_by_id(&self, guid: Uuid) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT guid, username, password_hash, created_at
            FROM users
            WHERE guid = $1
            "#,
        )
        .bind(guid)
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or(StoreError::NotFound)
    }

    async fn delete(&self, guid: Uuid) -> StoreResult<()> {
        info!("Deleting user: {}", guid);

        let result = sqlx::query("DELETE FROM users WHERE guid = $1")
            .bind(guid)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}

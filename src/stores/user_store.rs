use async_trait::async_trait;

use crate::{
    db::DbPool,
    error::{StoreError, StoreResult},
    models::User,
    stores::{UserReader, UserWriter},
};

#[derive(Clone)]
pub struct UserStore {
    pool: DbPool,
}

impl UserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserWriter for UserStore {
    #[tracing::instrument(skip(self, password_hash), fields(op = "store.save_user"))]
    async fn save_user(&self, email: &str, password_hash: &str) -> StoreResult<i64> {
        tracing::info!("saving user");

        let (id,): (i64,) =
            sqlx::query_as("INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING id")
                .bind(email)
                .bind(password_hash)
                .fetch_one(&self.pool)
                .await
                .map_err(|err| match err {
                    sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                        tracing::warn!("email already registered");
                        StoreError::UserExists
                    }
                    other => {
                        tracing::error!(error = %other, "error inserting user");
                        StoreError::UserQueryFailed(other)
                    }
                })?;

        tracing::info!(id, "user saved");
        Ok(id)
    }
}

#[async_trait]
impl UserReader for UserStore {
    #[tracing::instrument(skip(self), fields(op = "store.user_by_email"))]
    async fn user_by_email(&self, email: &str) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "error loading user");
            StoreError::UserQueryFailed(err)
        })?;

        user.ok_or_else(|| {
            tracing::debug!("no user with this email");
            StoreError::UserNotFound
        })
    }
}

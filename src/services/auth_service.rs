use std::sync::Arc;

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;

use crate::{
    auth::TokenKeys,
    error::{ServiceError, ServiceResult, StoreError},
    services::{reject, store_failure},
    stores::{UserReader, UserWriter},
};

#[derive(Clone)]
pub struct AuthService {
    saver: Arc<dyn UserWriter>,
    provider: Arc<dyn UserReader>,
    tokens: TokenKeys,
}

impl AuthService {
    pub fn new(saver: Arc<dyn UserWriter>, provider: Arc<dyn UserReader>, tokens: TokenKeys) -> Self {
        Self {
            saver,
            provider,
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenKeys {
        &self.tokens
    }

    #[tracing::instrument(skip(self, password), fields(op = "auth.register"))]
    pub async fn register(&self, email: &str, password: &str) -> ServiceResult<i64> {
        validate(email, password)?;

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| {
                tracing::error!(error = %err, "failed to hash password");
                ServiceError::PasswordHash
            })?
            .to_string();

        let id = self
            .saver
            .save_user(email, &password_hash)
            .await
            .map_err(store_failure)?;

        tracing::info!(id, "user registered");
        Ok(id)
    }

    #[tracing::instrument(skip(self, password), fields(op = "auth.login"))]
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<String> {
        validate(email, password)?;

        let user = match self.provider.user_by_email(email).await {
            Ok(user) => user,
            Err(StoreError::UserNotFound) => {
                tracing::warn!("user not found");
                return Err(ServiceError::InvalidCredentials);
            }
            Err(err) => return Err(store_failure(err)),
        };

        let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|err| {
            tracing::error!(error = %err, "stored password hash is malformed");
            ServiceError::PasswordHash
        })?;

        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_err()
        {
            tracing::warn!("password mismatch");
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id).map_err(|err| {
            tracing::error!(error = %err, "failed to sign token");
            ServiceError::Token(err)
        })?;

        tracing::info!(id = user.id, "user logged in");
        Ok(token)
    }
}

fn validate(email: &str, password: &str) -> ServiceResult<()> {
    if email.trim().is_empty() {
        return Err(reject(ServiceError::EmailEmpty));
    }
    if password.is_empty() {
        return Err(reject(ServiceError::PasswordEmpty));
    }
    Ok(())
}

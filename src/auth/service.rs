use chrono::Duration;
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::password::CredentialHasher;
use crate::auth::token::TokenCodec;
use crate::config::AuthConfig;
use crate::db::models::{NewUser, User};
use crate::db::Store;
use crate::error::{AppError, AuthError, RegistrationError};
use crate::Result;

pub struct AuthService {
    store: Arc<dyn Store>,
    hasher: CredentialHasher,
    codec: TokenCodec,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, config: &AuthConfig) -> Result<Self> {
        Ok(Self {
            store,
            hasher: CredentialHasher::new(&config.password_hash)?,
            codec: TokenCodec::new(&config.jwt_secret)?,
            token_ttl: config.token_ttl()?,
        })
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Creates an active user. The only registration path in the service.
    pub async fn register(&self, email: &str, password: &str) -> Result<User> {
        if self.store.get_user_by_email(email).await?.is_some() {
            return Err(RegistrationError::EmailTaken.into());
        }

        let hashed_password = self.hash_password(password).await?;
        // a concurrent registration can still win; the store rejects it
        let user = self
            .store
            .create_user(&NewUser::new(email.to_string(), hashed_password))
            .await?;

        info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Returns the user only when the email exists and the password matches.
    /// Both failure cases produce `None`.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>> {
        let Some(user) = self.store.get_user_by_email(username).await? else {
            return Ok(None);
        };

        if self
            .verify_password(password, &user.hashed_password)
            .await?
        {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Authenticates and issues a bearer token valid for the configured ttl.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let user = self
            .authenticate(username, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let token = self.codec.issue(&user.email, self.token_ttl)?;
        info!("Issued access token for user {}", user.id);
        Ok(token)
    }

    /// Maps a bearer token to the user it names. Every token failure and a
    /// subject with no matching user come back as `Unauthenticated`.
    pub async fn resolve(&self, token: &str) -> Result<User> {
        let subject = self.codec.verify(token).map_err(|e| {
            warn!("Rejected bearer token: {}", e);
            AuthError::Unauthenticated
        })?;

        match self.store.get_user_by_email(&subject).await? {
            Some(user) => Ok(user),
            None => {
                warn!("Rejected bearer token: subject has no account");
                Err(AuthError::Unauthenticated.into())
            }
        }
    }

    async fn hash_password(&self, password: &str) -> Result<String> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::InternalError(format!("Password hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: &str, hashed: &str) -> Result<bool> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hashed = hashed.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hashed))
            .await
            .map_err(|e| AppError::InternalError(format!("Password verification task failed: {}", e)))
    }
}

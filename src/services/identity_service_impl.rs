//! `SeaORM` implementation of the `IdentityService` trait.

use async_trait::async_trait;
use tokio::task;

use crate::auth;
use crate::config::{AuthConfig, SecurityConfig};
use crate::db::{Store, User, repositories::user::hash_password};
use crate::services::identity_service::{
    AuthSession, IdentityError, IdentityService, PublicUser,
};

pub struct SeaOrmIdentityService {
    store: Store,
    auth_config: AuthConfig,
    security_config: SecurityConfig,
}

impl SeaOrmIdentityService {
    #[must_use]
    pub const fn new(
        store: Store,
        auth_config: AuthConfig,
        security_config: SecurityConfig,
    ) -> Self {
        Self {
            store,
            auth_config,
            security_config,
        }
    }

    fn issue_session(&self, user: User) -> Result<AuthSession, IdentityError> {
        let access_token = auth::issue_token(
            user.id,
            user.is_admin,
            &self.auth_config.jwt_secret,
            self.auth_config.token_ttl_seconds,
        )
        .map_err(|e| IdentityError::Internal(e.to_string()))?;

        Ok(AuthSession {
            access_token,
            user: PublicUser::from(user),
        })
    }
}

#[async_trait]
impl IdentityService for SeaOrmIdentityService {
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, IdentityError> {
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(IdentityError::Validation(
                "Missing required fields".to_string(),
            ));
        }

        if self.store.username_or_email_taken(username, email).await? {
            return Err(IdentityError::Conflict);
        }

        // Argon2 hashing is CPU-intensive; keep it off the async runtime
        let password = password.to_string();
        let security = self.security_config.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, &security))
            .await
            .map_err(|e| IdentityError::Internal(format!("Hashing task panicked: {e}")))??;

        let user = self
            .store
            .create_user(username, email, &password_hash, false)
            .await?;

        tracing::info!("Registered user: {}", user.username);

        self.issue_session(user)
    }

    async fn login(&self, username: &str, password: &str) -> Result<AuthSession, IdentityError> {
        if username.is_empty() || password.is_empty() {
            return Err(IdentityError::Validation(
                "Missing username or password".to_string(),
            ));
        }

        let user = self
            .store
            .verify_user_credentials(username, password)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        self.issue_session(user)
    }

    async fn current_user(&self, user_id: i32) -> Result<PublicUser, IdentityError> {
        let user = self
            .store
            .get_user_by_id(user_id)
            .await?
            .ok_or(IdentityError::UserNotFound)?;

        Ok(PublicUser::from(user))
    }
}

//! Domain service for account creation and credential verification.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Errors specific to identity operations.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Deliberately does not reveal which field collided.
    #[error("Username or email already exists")]
    Conflict,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for IdentityError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Public user view; never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<crate::db::User> for PublicUser {
    fn from(user: crate::db::User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

/// A freshly issued session: bearer token plus the user it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub access_token: String,
    pub user: PublicUser,
}

#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Create an account and issue a session token for it.
    ///
    /// # Errors
    ///
    /// [`IdentityError::Validation`] when a required field is missing,
    /// [`IdentityError::Conflict`] when username or email is taken.
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, IdentityError>;

    /// Verify credentials and issue a session token.
    ///
    /// # Errors
    ///
    /// [`IdentityError::InvalidCredentials`] on unknown username or wrong
    /// password; callers cannot distinguish the two cases.
    async fn login(&self, username: &str, password: &str) -> Result<AuthSession, IdentityError>;

    /// Resolve a token's user id to a live user record.
    ///
    /// # Errors
    ///
    /// [`IdentityError::UserNotFound`] when the record no longer exists
    /// (stale token).
    async fn current_user(&self, user_id: i32) -> Result<PublicUser, IdentityError>;
}

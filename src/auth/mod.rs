//! Bearer token issuance and verification.
//!
//! Tokens are self-contained HS256 JWTs carrying the user id and an admin
//! flag. Claims are a capability snapshot: admin-gated handlers trust the
//! flag for the token's lifetime instead of re-reading the user row.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    Encode(jsonwebtoken::errors::Error),

    #[error("Invalid or expired token")]
    Invalid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id, stringly typed per JWT convention.
    pub sub: String,

    pub is_admin: bool,

    pub iat: i64,

    pub exp: i64,
}

/// Authenticated caller identity, decoded from the presented token and
/// attached to the request by the auth middleware.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: i32,

    pub is_admin: bool,
}

/// Issue a token for the given user, valid for `ttl_seconds`.
pub fn issue_token(
    user_id: i32,
    is_admin: bool,
    secret: &str,
    ttl_seconds: i64,
) -> Result<String, TokenError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        is_admin,
        iat: now,
        exp: now + ttl_seconds,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::Encode)
}

/// Verify a token's signature and expiry and resolve the caller identity.
pub fn verify_token(token: &str, secret: &str) -> Result<CurrentUser, TokenError> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| TokenError::Invalid)?;

    let id = data.claims.sub.parse().map_err(|_| TokenError::Invalid)?;

    Ok(CurrentUser {
        id,
        is_admin: data.claims.is_admin,
    })
}

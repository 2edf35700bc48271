//! Bearer token collaborators.
//!
//! The authentication stage only depends on [`TokenValidator`]; login only on
//! [`TokenIssuer`]. [`JwtTokens`] implements both.
use async_trait::async_trait;
use thiserror::Error;

pub mod factory;
pub mod jwt;

pub use factory::build_jwt_tokens;
pub use jwt::JwtTokens;

/// What a validator hands back for a token it accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    /// User id the token was issued for.
    pub subject: String,
    pub jti: Option<String>,
    /// Unix seconds.
    pub expires_at: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Resolves an opaque bearer token. Called concurrently from many requests.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<VerifiedToken, TokenError>;
}

pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user_id: &str, email: &str) -> Result<String, TokenError>;
}

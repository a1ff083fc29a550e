//! Token-service seam used by the authentication guard.
use async_trait::async_trait;
use thiserror::Error;

/// Decoded credential, as far as the pipeline cares.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    pub user_id: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub tenant_id: Option<String>,
    /// Full decoded payload.
    pub raw: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token rejected: {0}")]
    Invalid(String),
}

impl TokenError {
    pub fn is_expired(&self) -> bool {
        matches!(self, TokenError::Expired)
    }
}

#[async_trait]
pub trait TokenService: Send + Sync {
    async fn validate(&self, token: &str) -> Result<Claims, TokenError>;
}

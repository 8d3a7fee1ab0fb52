//! Third-party identity assertions

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity extracted from a verified provider token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    /// Provider subject id (stable per account)
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
    /// Avatar URL
    pub picture: Option<String>,
}

/// Identity verification errors
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Invalid identity token: {0}")]
    InvalidToken(String),

    #[error("Identity token rejected: {0}")]
    Rejected(#[from] jsonwebtoken::errors::Error),

    #[error("No signing key matches key id '{0}'")]
    UnknownKey(String),

    #[error("Identity token has no e-mail claim")]
    MissingEmail,

    #[error("Failed to fetch identity provider keys: {0}")]
    KeyFetch(String),
}

impl IdentityError {
    /// Whether the failure lies with the presented credential rather than the provider
    pub fn is_credential_error(&self) -> bool {
        !matches!(self, IdentityError::KeyFetch(_))
    }
}

/// Verifies an identity-provider credential and returns the asserted identity
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, IdentityError>;
}

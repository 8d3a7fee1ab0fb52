//! Authentication and authorization for the civic portal

pub mod admin;
pub mod google;
pub mod identity;
pub mod jwt;

pub use admin::AdminAllowList;
pub use google::GoogleIdTokenVerifier;
pub use identity::{IdentityError, IdentityVerifier, VerifiedIdentity};
pub use jwt::{JwtError, JwtValidator, SessionClaims};

// Re-export useful types
pub use async_trait::async_trait;

//! API Middleware
//!
//! Middleware layers for authentication and role-based authorization.

pub mod auth;

pub use auth::{require_auth, require_role, AuthUser, JwtState};

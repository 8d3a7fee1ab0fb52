//! Session authentication and role middleware
//!
//! `require_auth` extracts the session token from the `Authorization: Bearer`
//! header, validates it and makes the caller available to handlers via
//! Axum's Extension. `require_role` is layered inside it on routers that
//! need a specific role.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use civic_auth::JwtValidator;
use civic_db::entities::user::UserRole;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::models::ErrorResponse;

/// Authenticated caller extracted from the session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    /// Local user id
    pub user_id: Uuid,
    /// Role at the time the token was issued
    pub role: UserRole,
}

/// JWT validation state shared across middleware instances
#[derive(Clone)]
pub struct JwtState {
    pub validator: Arc<JwtValidator>,
}

impl JwtState {
    /// Create new JWT state with the given secret
    pub fn new(secret: &[u8]) -> Self {
        Self {
            validator: Arc::new(JwtValidator::new(secret)),
        }
    }
}

fn forbidden(message: impl Into<String>, code: &str) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::FORBIDDEN, Json(ErrorResponse::new(message, code)))
}

/// Authentication middleware that validates session tokens
///
/// # Errors
/// - 401 when the Authorization header is absent
/// - 403 when the header is not a Bearer token, or the token is invalid or expired
pub async fn require_auth(
    State(state): State<Arc<JwtState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new(
                    "Access denied. No token provided.",
                    "MISSING_AUTH",
                )),
            )
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        forbidden(
            "Invalid Authorization header format. Expected 'Bearer <token>'",
            "INVALID_AUTH_FORMAT",
        )
    })?;

    let claims = state.validator.validate(token.trim()).map_err(|e| {
        warn!("Rejected session token: {}", e);
        forbidden("Invalid or expired token", "INVALID_TOKEN")
    })?;

    let role = UserRole::parse(&claims.role).ok_or_else(|| {
        forbidden(
            format!("Unknown role '{}' in token", claims.role),
            "INVALID_TOKEN",
        )
    })?;

    request.extensions_mut().insert(AuthUser {
        user_id: claims.id,
        role,
    });

    Ok(next.run(request).await)
}

/// Authorization middleware admitting only callers holding `required`
///
/// Must be layered inside [`require_auth`]. Runs before the handler's
/// extractors, so a caller without the role is refused whatever the body.
pub async fn require_role(
    State(required): State<UserRole>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let caller = request.extensions().get::<AuthUser>().ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(
                "Access denied. No token provided.",
                "MISSING_AUTH",
            )),
        )
    })?;

    if caller.role != required {
        warn!(
            "User {} with role '{}' denied access to {}",
            caller.user_id,
            caller.role.as_str(),
            request.uri().path()
        );
        return Err(forbidden(
            format!("Access denied. {} role required.", required.as_str()),
            "FORBIDDEN",
        ));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, middleware, routing::get, Router};
    use chrono::Duration;
    use civic_auth::SessionClaims;
    use tower::ServiceExt; // For oneshot()

    const SECRET: &[u8] = b"test-secret-key";

    async fn protected_handler(axum::Extension(user): axum::Extension<AuthUser>) -> Json<AuthUser> {
        Json(user)
    }

    fn create_test_app() -> Router {
        let jwt_state = Arc::new(JwtState::new(SECRET));

        let admin = Router::new()
            .route("/admin", get(protected_handler))
            .layer(middleware::from_fn_with_state(UserRole::Admin, require_role));

        Router::new()
            .route("/protected", get(protected_handler))
            .merge(admin)
            .layer(middleware::from_fn_with_state(jwt_state, require_auth))
    }

    fn token_for(role: &str) -> String {
        let claims = SessionClaims::new(Uuid::new_v4(), role);
        JwtValidator::encode(SECRET, &claims).unwrap()
    }

    async fn call(app: Router, uri: &str, authorization: Option<String>) -> Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        app.oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn error_body(response: Response) -> ErrorResponse {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_valid_session_token() {
        let id = Uuid::new_v4();
        let token = JwtValidator::encode(SECRET, &SessionClaims::new(id, "citizen")).unwrap();

        let response = call(
            create_test_app(),
            "/protected",
            Some(format!("Bearer {}", token)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let auth_user: AuthUser = serde_json::from_slice(&body).unwrap();

        assert_eq!(auth_user.user_id, id);
        assert_eq!(auth_user.role, UserRole::Citizen);
    }

    #[tokio::test]
    async fn test_missing_authorization_header() {
        let response = call(create_test_app(), "/protected", None).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_body(response).await.code.as_deref(), Some("MISSING_AUTH"));
    }

    #[tokio::test]
    async fn test_invalid_bearer_format() {
        let response = call(
            create_test_app(),
            "/protected",
            Some("InvalidFormat token123".to_string()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_expired_token() {
        let claims =
            SessionClaims::new(Uuid::new_v4(), "citizen").with_validity(Duration::seconds(-120));
        let token = JwtValidator::encode(SECRET, &claims).unwrap();

        let response = call(
            create_test_app(),
            "/protected",
            Some(format!("Bearer {}", token)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(error_body(response)
            .await
            .message
            .contains("Invalid or expired token"));
    }

    #[tokio::test]
    async fn test_wrong_secret() {
        let claims = SessionClaims::new(Uuid::new_v4(), "admin");
        let token = JwtValidator::encode(b"wrong-secret-key", &claims).unwrap();

        let response = call(
            create_test_app(),
            "/protected",
            Some(format!("Bearer {}", token)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_role_gate_rejects_citizen() {
        let response = call(
            create_test_app(),
            "/admin",
            Some(format!("Bearer {}", token_for("citizen"))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(error_body(response).await.code.as_deref(), Some("FORBIDDEN"));
    }

    #[tokio::test]
    async fn test_role_gate_admits_admin() {
        let response = call(
            create_test_app(),
            "/admin",
            Some(format!("Bearer {}", token_for("admin"))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_role_rejected() {
        let response = call(
            create_test_app(),
            "/protected",
            Some(format!("Bearer {}", token_for("superuser"))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

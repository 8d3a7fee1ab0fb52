//! Google sign-in: identity assertion in, portal session out

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use chrono::Utc;
use civic_auth::{JwtValidator, SessionClaims, VerifiedIdentity};
use civic_db::entities::user::{self, UserRole};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set, SqlErr,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{bad_request, db_error, json_body};
use crate::models::{ApiResult, ErrorResponse, GoogleAuthRequest, GoogleAuthResponse};
use crate::AppState;

/// Exchange a Google ID token for a session token
#[utoipa::path(
    post,
    path = "/api/auth/google",
    request_body = GoogleAuthRequest,
    responses(
        (status = 200, description = "Signed in", body = GoogleAuthResponse),
        (status = 400, description = "Missing credential", body = ErrorResponse),
        (status = 401, description = "Identity token rejected", body = ErrorResponse),
        (status = 409, description = "E-mail bound to another Google account", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn google_auth(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GoogleAuthRequest>, JsonRejection>,
) -> ApiResult<Json<GoogleAuthResponse>> {
    let req = json_body(payload)?;
    if req.credential.trim().is_empty() {
        return Err(bad_request("credential is required"));
    }

    let identity = state
        .identity
        .verify(req.credential.trim())
        .await
        .map_err(|e| {
            if e.is_credential_error() {
                warn!("Google sign-in rejected: {}", e);
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse::new(
                        "Google authentication failed",
                        "INVALID_CREDENTIAL",
                    )),
                )
            } else {
                error!("Google key fetch failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(
                        ErrorResponse::new("Google authentication failed", "UPSTREAM_ERROR")
                            .with_details(e.to_string()),
                    ),
                )
            }
        })?;

    let is_admin = state.admins.contains(&identity.email);
    let user = resolve_user(&state.db, identity, is_admin).await?;

    let mut claims = SessionClaims::new(user.id, user.role.as_str());
    if let Some(ttl) = state.session_ttl {
        claims = claims.with_validity(ttl);
    }

    let token = JwtValidator::encode(&state.jwt_secret, &claims).map_err(|e| {
        error!("Failed to sign session token: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Failed to create session", "TOKEN_ERROR")),
        )
    })?;

    info!("User {} signed in as {}", user.email, user.role.as_str());

    Ok(Json(GoogleAuthResponse {
        token,
        user: user.into(),
    }))
}

/// Find or create the local account for `identity`, promoting allow-listed e-mails
async fn resolve_user(
    db: &DatabaseConnection,
    identity: VerifiedIdentity,
    is_admin: bool,
) -> ApiResult<user::Model> {
    let existing = find_by_google_id(db, &identity.subject).await?;

    let user = match existing {
        Some(user) => user,
        None => match new_account(&identity, is_admin).insert(db).await {
            Ok(user) => {
                info!(
                    "Created {} account for {}",
                    user.role.as_str(),
                    user.email
                );
                return Ok(user);
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                // Lost a race with a concurrent first sign-in, or the e-mail
                // belongs to a different Google account.
                find_by_google_id(db, &identity.subject)
                    .await?
                    .ok_or_else(|| {
                        warn!(
                            "E-mail {} already bound to another Google account",
                            identity.email
                        );
                        (
                            StatusCode::CONFLICT,
                            Json(ErrorResponse::new(
                                "This e-mail is already linked to another account",
                                "EMAIL_IN_USE",
                            )),
                        )
                    })?
            }
            Err(e) => return Err(db_error(e)),
        },
    };

    if is_admin && user.role != UserRole::Admin {
        let mut active = user.into_active_model();
        active.role = Set(UserRole::Admin);
        active.is_verified = Set(true);
        active.is_profile_complete = Set(true);
        let promoted = active.update(db).await.map_err(db_error)?;

        info!("Promoted {} to admin", promoted.email);
        return Ok(promoted);
    }

    Ok(user)
}

async fn find_by_google_id(
    db: &DatabaseConnection,
    google_id: &str,
) -> ApiResult<Option<user::Model>> {
    user::Entity::find()
        .filter(user::Column::GoogleId.eq(google_id))
        .one(db)
        .await
        .map_err(db_error)
}

fn new_account(identity: &VerifiedIdentity, is_admin: bool) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        google_id: Set(identity.subject.clone()),
        email: Set(identity.email.clone()),
        name: Set(identity.name.clone()),
        mobile: Set(None),
        address: Set(None),
        ward_number: Set(None),
        photo: Set(identity.picture.clone()),
        aadhar_photo: Set(None),
        epic_number: Set(None),
        language: Set(None),
        district: Set(None),
        municipality: Set(None),
        role: Set(if is_admin {
            UserRole::Admin
        } else {
            UserRole::Citizen
        }),
        is_verified: Set(is_admin),
        is_profile_complete: Set(is_admin),
        created_at: Set(Utc::now()),
    }
}

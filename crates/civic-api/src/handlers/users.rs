use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use civic_db::entities::{complaint, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::{db_error, json_body, non_empty, not_found};
use crate::middleware::AuthUser;
use crate::models::{ApiResult, ErrorResponse, MessageResponse, UpdateProfileRequest, User};
use crate::AppState;

/// Merge a profile update into the stored record
///
/// Provided non-empty values replace stored ones; absent or blank values
/// keep what is stored. Completeness is recomputed afterwards.
fn merge_profile(mut current: user::Model, req: UpdateProfileRequest) -> user::Model {
    fn merge(slot: &mut Option<String>, value: Option<String>) {
        if let Some(v) = non_empty(value) {
            *slot = Some(v);
        }
    }

    merge(&mut current.name, req.name);
    merge(&mut current.mobile, req.mobile);
    merge(&mut current.address, req.address);
    merge(&mut current.epic_number, req.epic_number);
    merge(&mut current.photo, req.photo);
    merge(&mut current.aadhar_photo, req.aadhar_photo);
    merge(&mut current.language, req.language);
    merge(&mut current.district, req.district);
    merge(&mut current.municipality, req.municipality);
    if let Some(ward) = req.ward_number {
        current.ward_number = Some(ward);
    }

    current.is_profile_complete = current.has_required_profile_fields();
    current
}

/// Update the caller's profile
#[utoipa::path(
    put,
    path = "/api/user/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = User),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let req = json_body(payload)?;

    let current = user::Entity::find_by_id(auth.user_id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("User not found"))?;

    let merged = merge_profile(current.clone(), req);

    let mut active = current.into_active_model();
    active.name = Set(merged.name);
    active.mobile = Set(merged.mobile);
    active.address = Set(merged.address);
    active.ward_number = Set(merged.ward_number);
    active.epic_number = Set(merged.epic_number);
    active.photo = Set(merged.photo);
    active.aadhar_photo = Set(merged.aadhar_photo);
    active.language = Set(merged.language);
    active.district = Set(merged.district);
    active.municipality = Set(merged.municipality);
    active.is_profile_complete = Set(merged.is_profile_complete);

    let updated = active.update(&state.db).await.map_err(db_error)?;

    info!(
        "Profile updated for {} (complete: {})",
        updated.email, updated.is_profile_complete
    );

    Ok(Json(updated.into()))
}

/// Get the caller's own record (`null` if it no longer exists)
#[utoipa::path(
    get,
    path = "/api/user/me",
    responses(
        (status = 200, description = "Current user or null", body = Option<User>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<Option<User>>> {
    let user = user::Entity::find_by_id(auth.user_id)
        .one(&state.db)
        .await
        .map_err(db_error)?;

    Ok(Json(user.map(User::from)))
}

/// List citizen accounts, newest first
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "Citizens", body = Vec<User>),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<User>>> {
    debug!("Listing citizens");

    let users = user::Entity::find()
        .filter(user::Column::Role.eq(user::UserRole::Citizen))
        .order_by_desc(user::Column::CreatedAt)
        .all(&state.db)
        .await
        .map_err(db_error)?;

    Ok(Json(users.into_iter().map(User::from).collect()))
}

/// Delete a user together with their complaints
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let txn = state.db.begin().await.map_err(db_error)?;

    let target = user::Entity::find_by_id(id)
        .one(&txn)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("User not found"))?;

    let removed = complaint::Entity::delete_many()
        .filter(complaint::Column::UserId.eq(id))
        .exec(&txn)
        .await
        .map_err(db_error)?;
    user::Entity::delete_by_id(id)
        .exec(&txn)
        .await
        .map_err(db_error)?;

    txn.commit().await.map_err(db_error)?;

    info!(
        "Deleted user {} and {} complaints",
        target.email, removed.rows_affected
    );

    Ok(Json(MessageResponse::new("User deleted successfully")))
}

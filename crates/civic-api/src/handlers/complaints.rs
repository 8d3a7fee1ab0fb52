use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use civic_db::{
    entities::complaint,
    lifecycle::{LifecycleError, NewComplaint, StatusUpdate},
};
use sea_orm::{
    sea_query::{Expr, Func, LikeExpr},
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{bad_request, db_error, json_body, non_empty};
use crate::middleware::AuthUser;
use crate::models::{
    ApiResult, Complaint, ComplaintQuery, CreateComplaintRequest, ErrorResponse,
    MessageResponse, UpdateComplaintRequest,
};
use crate::AppState;

fn lifecycle_error(e: LifecycleError) -> crate::models::ApiError {
    warn!("Complaint rejected: {}", e);
    bad_request(e.to_string())
}

/// Escape character for `LIKE` patterns built from user text
const LIKE_ESCAPE: char = '!';

/// Lowercased `%needle%` pattern with LIKE wildcards taken literally
fn address_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl From<CreateComplaintRequest> for NewComplaint {
    fn from(req: CreateComplaintRequest) -> Self {
        // The single-image field goes first so it stays the cover image.
        let image_urls = non_empty(req.image_url)
            .into_iter()
            .chain(req.image_urls)
            .collect();

        NewComplaint {
            category: req.category.into(),
            description: req.description,
            image_urls,
            voice_note_url: req.voice_note_url,
            address: req.address,
            latitude: req.latitude,
            longitude: req.longitude,
            ward_number: req.ward_number,
        }
    }
}

/// File a complaint as the caller
#[utoipa::path(
    post,
    path = "/api/complaints",
    request_body = CreateComplaintRequest,
    responses(
        (status = 201, description = "Complaint filed", body = Complaint),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "complaints"
)]
pub async fn create_complaint(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<CreateComplaintRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Complaint>)> {
    let req = json_body(payload)?;

    let created = NewComplaint::from(req)
        .into_active_model(auth.user_id, Utc::now())
        .map_err(lifecycle_error)?
        .insert(&state.db)
        .await
        .map_err(db_error)?;

    info!(
        "Complaint {} filed by {} in ward {}",
        created.id, auth.user_id, created.ward_number
    );

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List the caller's complaints, newest first
#[utoipa::path(
    get,
    path = "/api/complaints/me",
    responses(
        (status = 200, description = "Caller's complaints", body = Vec<Complaint>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "complaints"
)]
pub async fn my_complaints(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Complaint>>> {
    let complaints = complaint::Entity::find()
        .filter(complaint::Column::UserId.eq(auth.user_id))
        .order_by_desc(complaint::Column::CreatedAt)
        .all(&state.db)
        .await
        .map_err(db_error)?;

    Ok(Json(complaints.into_iter().map(Complaint::from).collect()))
}

/// List every complaint, newest first, with optional filters
#[utoipa::path(
    get,
    path = "/api/admin/complaints",
    params(ComplaintQuery),
    responses(
        (status = 200, description = "Complaints", body = Vec<Complaint>),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn list_complaints(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ComplaintQuery>,
) -> ApiResult<Json<Vec<Complaint>>> {
    debug!("Listing complaints with filters: {:?}", query);

    let mut condition = Condition::all();
    if let Some(ward) = query.ward {
        condition = condition.add(complaint::Column::WardNumber.eq(ward));
    }
    if let Some(category) = query.category {
        condition = condition
            .add(complaint::Column::Category.eq(complaint::ComplaintCategory::from(category)));
    }
    if let Some(status) = query.status {
        condition = condition
            .add(complaint::Column::Status.eq(complaint::ComplaintStatus::from(status)));
    }
    if let Some(address) = non_empty(query.address) {
        // Case-insensitive substring match on every backend
        let address_lower = Expr::expr(Func::lower(Expr::col(complaint::Column::Address)));
        condition = condition.add(
            address_lower.like(LikeExpr::new(address_pattern(&address)).escape(LIKE_ESCAPE)),
        );
    }

    let complaints = complaint::Entity::find()
        .filter(condition)
        .order_by_desc(complaint::Column::CreatedAt)
        .all(&state.db)
        .await
        .map_err(db_error)?;

    Ok(Json(complaints.into_iter().map(Complaint::from).collect()))
}

/// Change a complaint's status (`null` if the complaint does not exist)
#[utoipa::path(
    put,
    path = "/api/admin/complaints/{id}",
    params(
        ("id" = Uuid, Path, description = "Complaint ID")
    ),
    request_body = UpdateComplaintRequest,
    responses(
        (status = 200, description = "Updated complaint or null", body = Option<Complaint>),
        (status = 400, description = "Invalid status change", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn update_complaint(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateComplaintRequest>, JsonRejection>,
) -> ApiResult<Json<Option<Complaint>>> {
    let req = json_body(payload)?;

    let Some(current) = complaint::Entity::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(db_error)?
    else {
        debug!("Status update for unknown complaint {}", id);
        return Ok(Json(None));
    };

    let update = StatusUpdate {
        status: req.status.into(),
        solution_image_url: req.solution_image_url,
        resolution_note: req.resolution_note,
    };

    let updated = update
        .apply(current, Utc::now())
        .map_err(lifecycle_error)?
        .update(&state.db)
        .await
        .map_err(db_error)?;

    info!("Complaint {} moved to {:?}", updated.id, updated.status);

    Ok(Json(Some(updated.into())))
}

/// Delete a complaint
#[utoipa::path(
    delete,
    path = "/api/admin/complaints/{id}",
    params(
        ("id" = Uuid, Path, description = "Complaint ID")
    ),
    responses(
        (status = 200, description = "Complaint deleted", body = MessageResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn delete_complaint(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let result = complaint::Entity::delete_by_id(id)
        .exec(&state.db)
        .await
        .map_err(db_error)?;

    if result.rows_affected > 0 {
        info!("Deleted complaint {}", id);
    }

    Ok(Json(MessageResponse::new("Complaint deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ComplaintCategory;

    fn request() -> CreateComplaintRequest {
        CreateComplaintRequest {
            category: ComplaintCategory::Roads,
            description: "Pothole".to_string(),
            image_url: None,
            image_urls: vec![],
            voice_note_url: None,
            address: "34, B.T. Road, Halisahar".to_string(),
            latitude: 22.93,
            longitude: 88.43,
            ward_number: 12,
        }
    }

    #[test]
    fn test_single_image_leads_the_list() {
        let mut req = request();
        req.image_url = Some("https://img/cover.jpg".to_string());
        req.image_urls = vec!["https://img/2.jpg".to_string()];

        let new: NewComplaint = req.into();
        assert_eq!(
            new.image_urls,
            vec![
                "https://img/cover.jpg".to_string(),
                "https://img/2.jpg".to_string()
            ]
        );
    }

    #[test]
    fn test_address_pattern_escapes_wildcards() {
        assert_eq!(address_pattern("B.T. Road"), "%b.t. road%");
        assert_eq!(address_pattern("50%_off!"), "%50!%!_off!!%");
    }

    #[test]
    fn test_no_images_fails_validation() {
        let new: NewComplaint = request().into();
        assert!(new.validate().is_err());
    }
}

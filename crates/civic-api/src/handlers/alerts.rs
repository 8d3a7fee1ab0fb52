use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use civic_db::entities::alert::{self, ALL_WARDS};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::{bad_request, db_error, json_body, non_empty};
use crate::models::{
    Alert, ApiResult, CreateAlertRequest, ErrorResponse, MessageResponse, SendAlertResponse,
};
use crate::AppState;

/// Broadcast an alert to one ward or to all wards
#[utoipa::path(
    post,
    path = "/api/admin/send-alert",
    request_body = CreateAlertRequest,
    responses(
        (status = 201, description = "Alert sent", body = SendAlertResponse),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn send_alert(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateAlertRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SendAlertResponse>)> {
    let req = json_body(payload)?;

    let (Some(title), Some(message), Some(date), Some(time)) = (
        non_empty(req.title),
        non_empty(req.message),
        non_empty(req.date),
        non_empty(req.time),
    ) else {
        return Err(bad_request("title, message, date and time are required"));
    };
    let ward = non_empty(req.ward).unwrap_or_else(|| ALL_WARDS.to_string());

    let alert = alert::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(title),
        message: Set(message),
        ward: Set(ward),
        date: Set(date),
        time: Set(time),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await
    .map_err(db_error)?;

    info!("Alert '{}' sent to ward {}", alert.title, alert.ward);

    Ok((
        StatusCode::CREATED,
        Json(SendAlertResponse {
            message: "Alert sent successfully".to_string(),
            alert: alert.into(),
        }),
    ))
}

/// Alerts addressed to a ward, including broadcasts to all wards
#[utoipa::path(
    get,
    path = "/api/alerts/{ward}",
    params(
        ("ward" = String, Path, description = "Ward number")
    ),
    responses(
        (status = 200, description = "Alerts, newest first", body = Vec<Alert>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "alerts"
)]
pub async fn alerts_for_ward(
    State(state): State<Arc<AppState>>,
    Path(ward): Path<String>,
) -> ApiResult<Json<Vec<Alert>>> {
    debug!("Listing alerts for ward {}", ward);

    let alerts = alert::Entity::find()
        .filter(
            Condition::any()
                .add(alert::Column::Ward.eq(ward.trim()))
                .add(alert::Column::Ward.eq(ALL_WARDS)),
        )
        .order_by_desc(alert::Column::CreatedAt)
        .all(&state.db)
        .await
        .map_err(db_error)?;

    Ok(Json(alerts.into_iter().map(Alert::from).collect()))
}

/// Every alert, newest first
#[utoipa::path(
    get,
    path = "/api/admin/alerts",
    responses(
        (status = 200, description = "Alerts", body = Vec<Alert>),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn list_alerts(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Alert>>> {
    let alerts = alert::Entity::find()
        .order_by_desc(alert::Column::CreatedAt)
        .all(&state.db)
        .await
        .map_err(db_error)?;

    Ok(Json(alerts.into_iter().map(Alert::from).collect()))
}

/// Remove an alert
#[utoipa::path(
    delete,
    path = "/api/admin/alerts/{id}",
    params(
        ("id" = Uuid, Path, description = "Alert ID")
    ),
    responses(
        (status = 200, description = "Alert removed", body = MessageResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn delete_alert(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    alert::Entity::delete_by_id(id)
        .exec(&state.db)
        .await
        .map_err(db_error)?;

    info!("Removed alert {}", id);
    Ok(Json(MessageResponse::new("Alert removed successfully")))
}

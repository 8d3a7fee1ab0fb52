use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use civic_db::voter_roll::{self, SeedError};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{db_error, not_found};
use crate::models::{
    ApiResult, ClearVotersResponse, ErrorResponse, SeedVotersResponse, Voter,
};
use crate::AppState;

/// Look up a voter by EPIC number
#[utoipa::path(
    get,
    path = "/api/voter/{epic}",
    params(
        ("epic" = String, Path, description = "EPIC (voter id) number")
    ),
    responses(
        (status = 200, description = "Voter record", body = Voter),
        (status = 404, description = "Unknown EPIC number", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "voters"
)]
pub async fn get_voter(
    State(state): State<Arc<AppState>>,
    Path(epic): Path<String>,
) -> ApiResult<Json<Voter>> {
    debug!("Voter lookup for {}", epic);

    let voter = voter_roll::find_by_epic(&state.db, epic.trim())
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Voter EPIC not found"))?;

    Ok(Json(voter.into()))
}

/// Load the fixture roll into an empty registry
#[utoipa::path(
    post,
    path = "/api/admin/seed-voters",
    responses(
        (status = 201, description = "Registry seeded", body = SeedVotersResponse),
        (status = 400, description = "Registry already populated", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn seed_voters(
    State(state): State<Arc<AppState>>,
) -> ApiResult<(StatusCode, Json<SeedVotersResponse>)> {
    match voter_roll::seed(&state.db).await {
        Ok(count) => Ok((
            StatusCode::CREATED,
            Json(SeedVotersResponse {
                message: "Voters seeded successfully".to_string(),
                count,
            }),
        )),
        Err(e @ SeedError::AlreadySeeded(_)) => {
            warn!("{}", e);
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(e.to_string(), "VOTERS_EXIST")),
            ))
        }
        Err(SeedError::Database(e)) => Err(db_error(e)),
    }
}

/// Remove every voter record
#[utoipa::path(
    delete,
    path = "/api/admin/clear-voters",
    responses(
        (status = 200, description = "Registry cleared", body = ClearVotersResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn clear_voters(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ClearVotersResponse>> {
    let deleted_count = voter_roll::clear(&state.db).await.map_err(db_error)?;
    info!("Voter registry cleared");

    Ok(Json(ClearVotersResponse {
        message: "All voters cleared".to_string(),
        deleted_count,
    }))
}

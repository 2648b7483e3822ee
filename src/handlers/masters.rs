/*!
 * Master Management HTTP Handlers
 *
 * Tenant-facing master reads, admin-facing master writes and the weekly
 * schedule read/replace pair.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use validator::Validate;

use crate::{
    handlers::AppState,
    models::{MasterResponse, ReplaceScheduleRequest, Salon, UpsertMasterRequest},
    services::{CatalogService, ScheduleService},
    utils::{AppError, Result},
};

/// GET /api/v1/masters and GET /admin/api/masters
///
/// List the salon's masters
pub async fn list_masters(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
) -> Result<impl IntoResponse> {
    let service = CatalogService::new(state.pool.clone());
    let masters = service.list_masters(&salon).await?;

    let response: Vec<MasterResponse> = masters.into_iter().map(Into::into).collect();
    Ok((StatusCode::OK, Json(response)))
}

/// GET /api/v1/services/{id}/masters
///
/// List the masters offering a service
pub async fn get_masters_for_service(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Path(service_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let service = CatalogService::new(state.pool.clone());
    let masters = service.masters_for_service(&salon, service_id).await?;

    let response: Vec<MasterResponse> = masters.into_iter().map(Into::into).collect();
    Ok((StatusCode::OK, Json(response)))
}

/// POST /admin/api/masters
///
/// Create a master with the set of services they offer
pub async fn create_master(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Json(req): Json<UpsertMasterRequest>,
) -> Result<impl IntoResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = CatalogService::new(state.pool.clone());
    let created = service.create_master(&salon, req).await?;

    Ok((StatusCode::OK, Json(MasterResponse::from(created))))
}

/// PUT /admin/api/masters/{id}
///
/// Update a master and replace their service membership
pub async fn update_master(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Path(master_id): Path<i64>,
    Json(req): Json<UpsertMasterRequest>,
) -> Result<impl IntoResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = CatalogService::new(state.pool.clone());
    let updated = service.update_master(&salon, master_id, req).await?;

    Ok((StatusCode::OK, Json(MasterResponse::from(updated))))
}

/// DELETE /admin/api/masters/{id}
///
/// Delete a master (refused while appointments reference them)
pub async fn delete_master(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Path(master_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let service = CatalogService::new(state.pool.clone());
    service.delete_master(&salon, master_id).await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({"message": "Master deleted"})),
    ))
}

/// GET /admin/api/masters/{id}/schedule
///
/// Read a master's weekly schedule: always 7 entries, days 1..=7
pub async fn get_master_schedule(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Path(master_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let service = ScheduleService::new(state.pool.clone());
    let schedule = service.weekly_schedule(&salon, master_id).await?;

    Ok((StatusCode::OK, Json(schedule)))
}

/// PUT /admin/api/masters/{id}/schedule
///
/// Replace a master's weekly schedule atomically
pub async fn put_master_schedule(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Path(master_id): Path<i64>,
    Json(req): Json<ReplaceScheduleRequest>,
) -> Result<impl IntoResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = ScheduleService::new(state.pool.clone());
    let schedule = service.replace_schedule(&salon, master_id, req).await?;

    Ok((StatusCode::OK, Json(schedule)))
}

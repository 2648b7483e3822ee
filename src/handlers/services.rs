/*!
 * Service Catalog HTTP Handlers
 *
 * Tenant-facing catalog reads and admin-facing service writes. The
 * authenticated salon arrives as a request extension from the auth layer.
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
    models::{Salon, ServiceResponse, UpsertServiceRequest},
    services::CatalogService,
    utils::{AppError, Result},
};

/// GET /api/v1/services and GET /admin/api/services
///
/// List the salon's services
pub async fn list_services(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
) -> Result<impl IntoResponse> {
    let service = CatalogService::new(state.pool.clone());
    let services = service.list_services(&salon).await?;

    let response: Vec<ServiceResponse> = services.into_iter().map(Into::into).collect();
    Ok((StatusCode::OK, Json(response)))
}

/// GET /admin/api/masters/{id}/services
///
/// List the services a master offers
pub async fn get_services_of_master(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Path(master_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let service = CatalogService::new(state.pool.clone());
    let services = service.services_of_master(&salon, master_id).await?;

    let response: Vec<ServiceResponse> = services.into_iter().map(Into::into).collect();
    Ok((StatusCode::OK, Json(response)))
}

/// GET /api/v1/salon-info
///
/// Compact catalog digest for the conversational front-end
pub async fn get_salon_info(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
) -> Result<impl IntoResponse> {
    let service = CatalogService::new(state.pool.clone());
    let info = service.salon_info(&salon).await?;

    Ok((StatusCode::OK, Json(info)))
}

/// POST /admin/api/services
///
/// Create a service
pub async fn create_service(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Json(req): Json<UpsertServiceRequest>,
) -> Result<impl IntoResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = CatalogService::new(state.pool.clone());
    let created = service.create_service(&salon, req).await?;

    Ok((StatusCode::OK, Json(ServiceResponse::from(created))))
}

/// PUT /admin/api/services/{id}
///
/// Update a service
pub async fn update_service(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Path(service_id): Path<i64>,
    Json(req): Json<UpsertServiceRequest>,
) -> Result<impl IntoResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = CatalogService::new(state.pool.clone());
    let updated = service.update_service(&salon, service_id, req).await?;

    Ok((StatusCode::OK, Json(ServiceResponse::from(updated))))
}

/// DELETE /admin/api/services/{id}
///
/// Delete a service (refused while appointments reference it)
pub async fn delete_service(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Path(service_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let service = CatalogService::new(state.pool.clone());
    service.delete_service(&salon, service_id).await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({"message": "Service deleted"})),
    ))
}

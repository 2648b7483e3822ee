/*!
 * Salon Lifecycle HTTP Handlers
 *
 * Super-admin endpoints for creating, listing and updating tenants. The
 * create endpoint is form-encoded (submitted by the operator's browser
 * form); update is JSON.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Form, Json,
};
use validator::Validate;

use crate::{
    handlers::AppState,
    models::{CreateSalonForm, SalonResponse, UpdateSalonRequest},
    services::SalonService,
    utils::{AppError, Result},
};

/// GET /superadmin/salons
///
/// List all tenants
pub async fn list_salons(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let service = SalonService::new(state.pool.clone());
    let salons = service.list_salons().await?;

    let response: Vec<SalonResponse> = salons.into_iter().map(Into::into).collect();
    Ok((StatusCode::OK, Json(response)))
}

/// POST /superadmin/salons
///
/// Create a tenant (form-encoded: name, title, token, password)
pub async fn create_salon(
    State(state): State<AppState>,
    Form(req): Form<CreateSalonForm>,
) -> Result<impl IntoResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = SalonService::new(state.pool.clone());
    let salon = service
        .create_salon(req, state.booking.default_timezone)
        .await?;

    Ok((StatusCode::OK, Json(SalonResponse::from(salon))))
}

/// PUT /superadmin/salons/{id}
///
/// Update a tenant's credentials, activation flag and timezone
pub async fn update_salon(
    State(state): State<AppState>,
    Path(salon_id): Path<i64>,
    Json(req): Json<UpdateSalonRequest>,
) -> Result<impl IntoResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = SalonService::new(state.pool.clone());
    let salon = service.update_salon(salon_id, req).await?;

    Ok((StatusCode::OK, Json(SalonResponse::from(salon))))
}

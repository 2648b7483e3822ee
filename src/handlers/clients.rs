/*!
 * Client HTTP Handlers
 *
 * Bot-facing client endpoints (own appointments, phone upsert) and the
 * admin-facing client CRUD.
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
    models::{ClientResponse, Salon, UpdateClientPhoneRequest, UpsertClientRequest},
    services::{BookingService, ClientService},
    utils::{AppError, Result},
};

/// GET /api/v1/clients/{external_user_id}/appointments
///
/// Future appointments of a chat user, ascending
pub async fn get_client_appointments(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Path(external_user_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let service = BookingService::new(state.pool.clone());
    let appointments = service
        .list_client_appointments(&salon, external_user_id)
        .await?;

    Ok((StatusCode::OK, Json(appointments)))
}

/// PATCH /api/v1/clients/{external_user_id}
///
/// Upsert a chat user's phone number
pub async fn update_client_phone(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Path(external_user_id): Path<i64>,
    Json(req): Json<UpdateClientPhoneRequest>,
) -> Result<impl IntoResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = BookingService::new(state.pool.clone());
    service
        .update_client_phone(&salon, external_user_id, &req.phone_number)
        .await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({"message": "Phone number updated successfully"})),
    ))
}

/// GET /admin/api/clients
///
/// List the salon's clients
pub async fn admin_list_clients(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
) -> Result<impl IntoResponse> {
    let service = ClientService::new(state.pool.clone());
    let clients = service.list_clients(&salon).await?;

    let response: Vec<ClientResponse> = clients.into_iter().map(Into::into).collect();
    Ok((StatusCode::OK, Json(response)))
}

/// POST /admin/api/clients
///
/// Create a client manually
pub async fn admin_create_client(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Json(req): Json<UpsertClientRequest>,
) -> Result<impl IntoResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = ClientService::new(state.pool.clone());
    let client = service.create_client(&salon, req).await?;

    Ok((StatusCode::OK, Json(ClientResponse::from(client))))
}

/// PUT /admin/api/clients/{id}
///
/// Update a client's name and phone
pub async fn admin_update_client(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Path(client_id): Path<i64>,
    Json(req): Json<UpsertClientRequest>,
) -> Result<impl IntoResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = ClientService::new(state.pool.clone());
    let client = service.update_client(&salon, client_id, req).await?;

    Ok((StatusCode::OK, Json(ClientResponse::from(client))))
}

/// DELETE /admin/api/clients/{id}
///
/// Delete a client (refused while appointments reference them)
pub async fn admin_delete_client(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Path(client_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let service = ClientService::new(state.pool.clone());
    service.delete_client(&salon, client_id).await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({"message": "Client deleted"})),
    ))
}

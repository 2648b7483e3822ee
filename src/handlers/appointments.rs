/*!
 * Appointment HTTP Handlers
 *
 * Bot-path booking and cancellation, the natural-language booking endpoint,
 * and the admin booking CRUD with the day schedule listing.
 */

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::{
    handlers::AppState,
    models::{
        AdminCreateAppointmentRequest, AppointmentAdminView, CreateAppointmentRequest,
        NaturalAppointmentRequest, Salon, UpdateAppointmentRequest,
    },
    services::BookingService,
    utils::{AppError, Result},
};

/// POST /api/v1/appointments
///
/// Create an appointment on behalf of a chat user
pub async fn create_appointment(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Json(req): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = BookingService::new(state.pool.clone());
    let appointment = service.create_from_bot(&salon, req).await?;

    Ok((StatusCode::OK, Json(appointment)))
}

/// POST /api/v1/appointments/natural
///
/// Create an appointment from human-entered service/master names and
/// date/time strings
pub async fn create_natural_appointment(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Json(req): Json<NaturalAppointmentRequest>,
) -> Result<impl IntoResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = BookingService::new(state.pool.clone());
    let appointment = service.create_from_natural(&salon, req).await?;

    Ok((StatusCode::OK, Json(appointment)))
}

/// DELETE /api/v1/bot/appointments/{id}
///
/// Cancel an appointment (tenant-scoped)
pub async fn cancel_bot_appointment(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Path(appointment_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let service = BookingService::new(state.pool.clone());
    service.cancel_appointment(&salon, appointment_id).await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({"message": "Appointment cancelled successfully"})),
    ))
}

/// Query parameters for the admin day schedule
#[derive(Debug, Deserialize)]
pub struct DayScheduleQuery {
    pub selected_date: NaiveDate,
}

/// GET /admin/api/appointments?selected_date=YYYY-MM-DD
///
/// All of the salon's appointments within one calendar day, with resolved
/// client, master and service names, ordered by start time
pub async fn admin_day_schedule(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Query(query): Query<DayScheduleQuery>,
) -> Result<impl IntoResponse> {
    let day_start = query.selected_date.and_time(chrono::NaiveTime::MIN);
    let day_end = day_start + chrono::Duration::days(1);

    let appointments = sqlx::query_as::<_, AppointmentAdminView>(
        r#"
        SELECT a.id, a.client_id, c.name AS client_name,
               a.master_id, m.name AS master_name,
               a.service_id, s.name AS service_name,
               a.start_time, a.end_time
        FROM appointments a
        JOIN clients c ON c.id = a.client_id
        JOIN masters m ON m.id = a.master_id
        JOIN services s ON s.id = a.service_id
        WHERE a.salon_id = $1 AND a.start_time >= $2 AND a.start_time < $3
        ORDER BY a.start_time
        "#,
    )
    .bind(salon.id)
    .bind(day_start)
    .bind(day_end)
    .fetch_all(&state.pool)
    .await?;

    Ok((StatusCode::OK, Json(appointments)))
}

/// POST /admin/api/appointments
///
/// Create an appointment for an already-known client
pub async fn admin_create_appointment(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Json(req): Json<AdminCreateAppointmentRequest>,
) -> Result<impl IntoResponse> {
    let service = BookingService::new(state.pool.clone());
    let appointment = service.create_from_admin(&salon, req).await?;

    Ok((StatusCode::OK, Json(appointment)))
}

/// PUT /admin/api/appointments/{id}
///
/// Reschedule or re-assign an appointment
pub async fn admin_update_appointment(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Path(appointment_id): Path<i64>,
    Json(req): Json<UpdateAppointmentRequest>,
) -> Result<impl IntoResponse> {
    let service = BookingService::new(state.pool.clone());
    let appointment = service
        .update_appointment(&salon, appointment_id, req)
        .await?;

    Ok((StatusCode::OK, Json(appointment)))
}

/// DELETE /admin/api/appointments/{id}
///
/// Cancel an appointment from the admin UI
pub async fn admin_delete_appointment(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Path(appointment_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let service = BookingService::new(state.pool.clone());
    service.cancel_appointment(&salon, appointment_id).await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({"message": "Appointment cancelled successfully"})),
    ))
}

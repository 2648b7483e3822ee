/*!
 * Availability HTTP Handlers
 *
 * Bookable slots for a (service, master?, date) and the active days of a
 * month. Malformed dates are rejected by query deserialization with 400;
 * an invalid (year, month) pair yields an empty list by design.
 */

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    handlers::AppState,
    models::Salon,
    services::AvailabilityService,
    utils::Result,
};

/// Query parameters for the available-slots endpoint
#[derive(Debug, Deserialize)]
pub struct AvailableSlotsQuery {
    pub service_id: i64,
    pub selected_date: NaiveDate,
    pub master_id: Option<i64>,
    pub external_user_id: Option<i64>,
}

/// GET /api/v1/available-slots
///
/// Ordered bookable slots `{time, master_id}` for the date
pub async fn get_available_slots(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<impl IntoResponse> {
    let service = AvailabilityService::new(state.pool.clone(), state.booking.slot_grid_minutes);

    let slots = service
        .available_slots(
            &salon,
            query.service_id,
            query.selected_date,
            query.master_id,
            query.external_user_id,
        )
        .await?;

    Ok((StatusCode::OK, Json(slots)))
}

/// Query parameters for the active-days endpoint
#[derive(Debug, Deserialize)]
pub struct ActiveDaysQuery {
    pub service_id: i64,
    pub year: i32,
    pub month: u32,
    pub master_id: Option<i64>,
    pub external_user_id: Option<i64>,
}

/// GET /api/v1/active-days-in-month
///
/// Days of the month, from today onwards, with at least one bookable slot
pub async fn get_active_days(
    State(state): State<AppState>,
    Extension(salon): Extension<Salon>,
    Query(query): Query<ActiveDaysQuery>,
) -> Result<impl IntoResponse> {
    let service = AvailabilityService::new(state.pool.clone(), state.booking.slot_grid_minutes);

    let days = service
        .active_days_in_month(
            &salon,
            query.service_id,
            query.year,
            query.month,
            query.master_id,
            query.external_user_id,
        )
        .await?;

    Ok((StatusCode::OK, Json(days)))
}

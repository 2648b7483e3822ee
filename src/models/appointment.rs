/*!
 * Appointment Model
 *
 * A reservation tying one client, one master and one service to a time
 * interval. Times are naive wall-clock values in the salon's business
 * timezone; intervals are half-open `[start, end)`.
 */

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Appointment database model
#[derive(Debug, Clone, FromRow)]
pub struct Appointment {
    pub id: i64,
    pub salon_id: i64,
    pub client_id: i64,
    pub master_id: i64,
    pub service_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

/// Appointment summary with resolved catalog names, as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AppointmentSummary {
    pub id: i64,
    pub start_time: NaiveDateTime,
    pub service_name: String,
    pub master_name: String,
}

/// Admin view of an appointment for the day schedule
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AppointmentAdminView {
    pub id: i64,
    pub client_id: i64,
    pub client_name: Option<String>,
    pub master_id: i64,
    pub master_name: String,
    pub service_id: i64,
    pub service_name: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

/// Bot-path booking request: the client is identified by their chat user id
/// and created on first booking.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAppointmentRequest {
    pub external_user_id: i64,
    #[validate(length(min = 1, max = 255, message = "User name must not be empty"))]
    pub user_name: String,
    pub service_id: i64,
    pub master_id: i64,
    pub start_time: NaiveDateTime,
}

/// Admin-path booking request for an already-known client
#[derive(Debug, Clone, Deserialize)]
pub struct AdminCreateAppointmentRequest {
    pub client_id: i64,
    pub master_id: i64,
    pub service_id: i64,
    pub start_time: NaiveDateTime,
}

/// Admin-path reschedule/edit request
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub master_id: i64,
    pub service_id: i64,
    pub start_time: NaiveDateTime,
}

/// Booking request with human-entered catalog names and date/time strings,
/// as produced by the conversational front-end.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NaturalAppointmentRequest {
    pub external_user_id: i64,
    #[validate(length(min = 1, max = 255, message = "User name must not be empty"))]
    pub user_name: String,
    #[validate(length(min = 1, max = 255, message = "Service name must not be empty"))]
    pub service_name: String,
    /// Calendar date, YYYY-MM-DD
    pub appointment_date: String,
    /// Time of day, HH:MM
    pub appointment_time: String,
    pub master_name: Option<String>,
}

/// One bookable slot: a time of day and the master who is free then
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvailableSlot {
    /// Start time of day, HH:MM
    pub time: String,
    pub master_id: i64,
}

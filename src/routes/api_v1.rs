/*!
 * Tenant API Routes
 *
 * The token-authenticated surface consumed by the conversational front-end:
 * catalog reads, availability, booking and the client's own appointments.
 */

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use crate::handlers::{
    cancel_bot_appointment, create_appointment, create_natural_appointment, get_active_days,
    get_available_slots, get_client_appointments, get_masters_for_service, get_salon_info,
    list_masters, list_services, update_client_phone, AppState,
};
use crate::middleware::auth::salon_token_auth;

/// Create the `/api/v1` router. Every route requires a valid salon token.
pub fn create_api_v1_routes(state: AppState) -> Router {
    Router::new()
        .route("/services", get(list_services))
        .route("/masters", get(list_masters))
        .route("/services/{service_id}/masters", get(get_masters_for_service))
        .route("/salon-info", get(get_salon_info))
        .route("/available-slots", get(get_available_slots))
        .route("/active-days-in-month", get(get_active_days))
        .route("/appointments", post(create_appointment))
        .route("/appointments/natural", post(create_natural_appointment))
        .route(
            "/clients/{external_user_id}/appointments",
            get(get_client_appointments),
        )
        .route("/clients/{external_user_id}", patch(update_client_phone))
        .route("/bot/appointments/{appointment_id}", delete(cancel_bot_appointment))
        .layer(middleware::from_fn_with_state(state.clone(), salon_token_auth))
        .with_state(state)
}

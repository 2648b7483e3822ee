/*!
 * Admin API Routes
 *
 * The Basic-auth surface behind the salon administration UI: catalog and
 * schedule writes, client management and booking CRUD. A second router
 * covers the super-admin tenant lifecycle endpoints.
 */

use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use crate::handlers::{
    admin_create_appointment, admin_create_client, admin_day_schedule, admin_delete_appointment,
    admin_delete_client, admin_list_clients, admin_update_appointment, admin_update_client,
    create_master, create_salon, create_service, delete_master, delete_service,
    get_master_schedule, get_masters_for_service, get_services_of_master, list_masters,
    list_salons, list_services, put_master_schedule, update_master, update_salon, update_service,
    AppState,
};
use crate::middleware::auth::{admin_basic_auth, super_admin_auth};

/// Create the `/admin/api` router. Every route requires the salon's Basic
/// credentials.
pub fn create_admin_api_routes(state: AppState) -> Router {
    Router::new()
        .route("/services", get(list_services).post(create_service))
        .route(
            "/services/{service_id}",
            put(update_service).delete(delete_service),
        )
        .route("/services/{service_id}/masters", get(get_masters_for_service))
        .route("/masters", get(list_masters).post(create_master))
        .route("/masters/{master_id}", put(update_master).delete(delete_master))
        .route("/masters/{master_id}/services", get(get_services_of_master))
        .route(
            "/masters/{master_id}/schedule",
            get(get_master_schedule).put(put_master_schedule),
        )
        .route("/clients", get(admin_list_clients).post(admin_create_client))
        .route(
            "/clients/{client_id}",
            put(admin_update_client).delete(admin_delete_client),
        )
        .route(
            "/appointments",
            get(admin_day_schedule).post(admin_create_appointment),
        )
        .route(
            "/appointments/{appointment_id}",
            put(admin_update_appointment).delete(admin_delete_appointment),
        )
        .layer(middleware::from_fn_with_state(state.clone(), admin_basic_auth))
        .with_state(state)
}

/// Create the `/superadmin` router, restricted to the platform operator.
pub fn create_superadmin_routes(state: AppState) -> Router {
    Router::new()
        .route("/salons", get(list_salons).post(create_salon))
        .route("/salons/{salon_id}", put(update_salon))
        .layer(middleware::from_fn_with_state(state.clone(), super_admin_auth))
        .with_state(state)
}

/*!
 * HTTP Request Handlers Module
 *
 * Contains all HTTP request handlers for the API endpoints, plus the shared
 * application state they receive.
 */

use sqlx::PgPool;

use crate::config::{BookingConfig, SuperAdminConfig};

pub mod appointments;
pub mod availability;
pub mod clients;
pub mod masters;
pub mod salons;
pub mod services;

pub use appointments::{
    admin_create_appointment, admin_day_schedule, admin_delete_appointment,
    admin_update_appointment, cancel_bot_appointment, create_appointment,
    create_natural_appointment,
};
pub use availability::{get_active_days, get_available_slots};
pub use clients::{
    admin_create_client, admin_delete_client, admin_list_clients, admin_update_client,
    get_client_appointments, update_client_phone,
};
pub use masters::{
    create_master, delete_master, get_master_schedule, get_masters_for_service, list_masters,
    put_master_schedule, update_master,
};
pub use salons::{create_salon, list_salons, update_salon};
pub use services::{
    create_service, delete_service, get_salon_info, get_services_of_master, list_services,
    update_service,
};

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool; the only shared mutable resource
    pub pool: PgPool,
    /// Booking engine settings (slot grid, default timezone)
    pub booking: BookingConfig,
    /// Platform operator credentials
    pub super_admin: SuperAdminConfig,
}

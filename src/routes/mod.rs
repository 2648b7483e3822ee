/*!
 * Routes Module
 *
 * Assembles the three auth zones into the application router.
 */

pub mod admin_api;
pub mod api_v1;

pub use admin_api::{create_admin_api_routes, create_superadmin_routes};
pub use api_v1::create_api_v1_routes;

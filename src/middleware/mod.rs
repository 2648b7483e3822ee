/*!
 * Middleware Module
 *
 * Request-level middleware: authentication layers for the three auth zones.
 */

pub mod auth;

pub use auth::{admin_basic_auth, salon_token_auth, super_admin_auth, SALON_TOKEN_HEADER};

/*!
 * Database Module
 *
 * Database connection management and pool creation.
 */

pub mod pool;

pub use pool::create_pool;

/*!
 * Services Module
 *
 * Contains business logic and service layer implementations.
 */

pub mod availability_service;
pub mod booking_service;
pub mod catalog_service;
pub mod client_service;
pub mod salon_service;
pub mod schedule_service;
pub mod slot_grid;

pub use availability_service::AvailabilityService;
pub use booking_service::BookingService;
pub use catalog_service::{CatalogService, SalonInfo, ServiceDigest};
pub use client_service::ClientService;
pub use salon_service::SalonService;
pub use schedule_service::ScheduleService;

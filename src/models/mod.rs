/*!
 * Data Models Module
 *
 * Contains database models and their associated request/response DTOs.
 */

pub mod appointment;
pub mod client;
pub mod master;
pub mod salon;
pub mod schedule;
pub mod service;

pub use appointment::{
    AdminCreateAppointmentRequest, Appointment, AppointmentAdminView, AppointmentSummary,
    AvailableSlot, CreateAppointmentRequest, NaturalAppointmentRequest, UpdateAppointmentRequest,
};
pub use client::{Client, ClientResponse, UpdateClientPhoneRequest, UpsertClientRequest};
pub use master::{Master, MasterDigest, MasterResponse, UpsertMasterRequest};
pub use salon::{CreateSalonForm, Salon, SalonResponse, UpdateSalonRequest};
pub use schedule::{
    DayOfWeek, ReplaceScheduleRequest, Schedule, ScheduleEntry, WeeklyScheduleResponse,
};
pub use service::{Service, ServiceResponse, UpsertServiceRequest};

/*!
 * Service Model
 *
 * A bookable offering with a fixed price and duration, scoped to one salon.
 */

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Service database model
#[derive(Debug, Clone, FromRow)]
pub struct Service {
    pub id: i64,
    pub salon_id: i64,
    pub name: String,
    /// Price in whole currency units, non-negative
    pub price: i32,
    /// Appointment length; always positive
    pub duration_minutes: i32,
}

/// Service response DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub id: i64,
    pub name: String,
    pub price: i32,
    pub duration_minutes: i32,
}

impl From<Service> for ServiceResponse {
    fn from(service: Service) -> Self {
        Self {
            id: service.id,
            name: service.name,
            price: service.price,
            duration_minutes: service.duration_minutes,
        }
    }
}

/// Request to create or update a service
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertServiceRequest {
    #[validate(length(min = 1, max = 255, message = "Service name must not be empty"))]
    pub name: String,
    #[validate(range(min = 0, message = "Price must be non-negative"))]
    pub price: i32,
    #[validate(range(min = 1, message = "Duration must be a positive number of minutes"))]
    pub duration_minutes: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_duration_rejected() {
        let req = UpsertServiceRequest {
            name: "Манипюр".to_string(),
            price: 2000,
            duration_minutes: 0,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_negative_price_rejected() {
        let req = UpsertServiceRequest {
            name: "Стрижка".to_string(),
            price: -1,
            duration_minutes: 60,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_valid_request_accepted() {
        let req = UpsertServiceRequest {
            name: "Чистка лица".to_string(),
            price: 3500,
            duration_minutes: 75,
        };
        assert!(req.validate().is_ok());
    }
}

/*!
 * Salon Model
 *
 * A salon is a tenant: an isolated business account owning its own catalog,
 * schedules, clients and appointments. Created and toggled by the platform
 * operator; never deleted.
 */

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Salon database model
#[derive(Debug, Clone, FromRow)]
pub struct Salon {
    pub id: i64,
    /// Login name, unique, latin (used as the admin Basic-auth username)
    pub name: String,
    /// Human-readable salon title
    pub title: Option<String>,
    /// Shared secret presented by the chat front-end on every request
    pub bot_token: String,
    /// Admin UI password, compared in constant time
    pub admin_password: Option<String>,
    pub is_active: bool,
    /// IANA timezone name the salon's business day is computed in
    pub timezone: String,
}

impl Salon {
    /// Parse the salon's business timezone, falling back to Europe/Moscow
    /// when the stored name is not a valid IANA zone.
    pub fn business_timezone(&self) -> chrono_tz::Tz {
        self.timezone
            .parse()
            .unwrap_or(chrono_tz::Europe::Moscow)
    }
}

/// Salon response DTO. Never exposes the bot token or admin password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalonResponse {
    pub id: i64,
    pub name: String,
    pub title: Option<String>,
    pub is_active: bool,
    pub timezone: String,
}

impl From<Salon> for SalonResponse {
    fn from(salon: Salon) -> Self {
        Self {
            id: salon.id,
            name: salon.name,
            title: salon.title,
            is_active: salon.is_active,
            timezone: salon.timezone,
        }
    }
}

/// Form payload for creating a salon (super-admin only)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSalonForm {
    /// Login name (latin, unique across the installation)
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Display title
    #[validate(length(max = 255))]
    pub title: Option<String>,
    /// Bot token shared with the chat front-end
    #[validate(length(min = 8, max = 255))]
    pub token: String,
    /// Admin UI password
    #[validate(length(min = 1, max = 255))]
    pub password: String,
}

/// JSON payload for updating a salon (super-admin only)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSalonRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 8, max = 255))]
    pub bot_token: String,
    #[validate(length(min = 1, max = 255))]
    pub admin_password: String,
    pub is_active: bool,
    /// Optional IANA timezone override; unchanged when absent
    pub timezone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salon_with_timezone(timezone: &str) -> Salon {
        Salon {
            id: 1,
            name: "eleganse".to_string(),
            title: Some("Eleganse".to_string()),
            bot_token: "token".to_string(),
            admin_password: Some("pass".to_string()),
            is_active: true,
            timezone: timezone.to_string(),
        }
    }

    #[test]
    fn test_business_timezone_parses_iana_name() {
        let salon = salon_with_timezone("Europe/Berlin");
        assert_eq!(salon.business_timezone(), chrono_tz::Europe::Berlin);
    }

    #[test]
    fn test_business_timezone_falls_back_to_moscow() {
        let salon = salon_with_timezone("Not/AZone");
        assert_eq!(salon.business_timezone(), chrono_tz::Europe::Moscow);
    }

    #[test]
    fn test_response_hides_secrets() {
        let response: SalonResponse = salon_with_timezone("Europe/Moscow").into();
        let rendered = serde_json::to_string(&response).unwrap();
        assert!(!rendered.contains("token"));
        assert!(!rendered.contains("pass"));
    }
}

/*!
 * Client Model
 *
 * A salon's customer. Chat users are keyed by their external (chat platform)
 * user id; manually created clients receive synthetic negative external ids
 * so the per-salon uniqueness constraint holds.
 */

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Client database model
#[derive(Debug, Clone, FromRow)]
pub struct Client {
    pub id: i64,
    pub salon_id: i64,
    /// Chat-platform user id; negative for admin-created clients
    pub external_user_id: i64,
    pub name: Option<String>,
    pub phone_number: Option<String>,
}

/// Client response DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientResponse {
    pub id: i64,
    pub external_user_id: i64,
    pub name: Option<String>,
    pub phone_number: Option<String>,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            external_user_id: client.external_user_id,
            name: client.name,
            phone_number: client.phone_number,
        }
    }
}

/// Request to create or update a client through the admin UI
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertClientRequest {
    #[validate(length(min = 1, max = 255, message = "Client name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, max = 20, message = "Phone number must not be empty"))]
    pub phone_number: String,
    /// Chat user id, when known; a synthetic negative id is assigned otherwise
    pub external_user_id: Option<i64>,
}

/// Request to update a client's phone from the chat front-end
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateClientPhoneRequest {
    #[validate(length(min = 1, max = 20, message = "Phone number must not be empty"))]
    pub phone_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_request_validation() {
        let req = UpsertClientRequest {
            name: "Мария".to_string(),
            phone_number: "+79991234567".to_string(),
            external_user_id: None,
        };
        assert!(req.validate().is_ok());

        let req = UpsertClientRequest {
            name: String::new(),
            phone_number: "+79991234567".to_string(),
            external_user_id: Some(42),
        };
        assert!(req.validate().is_err());
    }
}

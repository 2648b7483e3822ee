/*!
 * Master Model
 *
 * A service provider within a salon. Masters are linked to the services they
 * offer through the master_services membership table.
 */

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Master database model
#[derive(Debug, Clone, FromRow)]
pub struct Master {
    pub id: i64,
    pub salon_id: i64,
    pub name: String,
    pub specialization: String,
    pub description: Option<String>,
}

/// Master response DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterResponse {
    pub id: i64,
    pub name: String,
    pub specialization: String,
    pub description: Option<String>,
}

impl From<Master> for MasterResponse {
    fn from(master: Master) -> Self {
        Self {
            id: master.id,
            name: master.name,
            specialization: master.specialization,
            description: master.description,
        }
    }
}

/// Request to create or update a master, with the full set of services
/// they offer. Membership replacement is idempotent.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertMasterRequest {
    #[validate(length(min = 1, max = 255, message = "Master name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "Specialization must not be empty"))]
    pub specialization: String,
    pub description: Option<String>,
    #[serde(default)]
    pub service_ids: Vec<i64>,
}

/// Compact master entry for the salon-info digest
#[derive(Debug, Clone, Serialize)]
pub struct MasterDigest {
    pub name: String,
    pub specialization: String,
    pub services: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_rejected() {
        let req = UpsertMasterRequest {
            name: String::new(),
            specialization: "Парикмахер-стилист".to_string(),
            description: None,
            service_ids: vec![],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_service_ids_default_to_empty() {
        let req: UpsertMasterRequest = serde_json::from_str(
            r#"{"name": "Анна Смирнова", "specialization": "Мастер маникюра"}"#,
        )
        .unwrap();
        assert!(req.service_ids.is_empty());
        assert!(req.validate().is_ok());
    }
}

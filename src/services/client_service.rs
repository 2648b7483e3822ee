/*!
 * Client Service Layer
 *
 * Manual (admin-path) client management. Chat-originated clients are created
 * by the booking engine; this service covers the admin UI's CRUD, assigning
 * synthetic negative external ids when no chat id is known so the per-salon
 * uniqueness constraint still holds.
 */

use sqlx::PgPool;

use crate::models::{Client, Salon, UpsertClientRequest};
use crate::utils::{AppError, Result};

/// Client service
pub struct ClientService {
    pool: PgPool,
}

impl ClientService {
    /// Create a new client service
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List the salon's clients, ordered by name
    pub async fn list_clients(&self, salon: &Salon) -> Result<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE salon_id = $1 ORDER BY name",
        )
        .bind(salon.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    /// Create a client manually. Without an external chat id, the next free
    /// synthetic negative id is assigned inside the insert transaction.
    pub async fn create_client(
        &self,
        salon: &Salon,
        data: UpsertClientRequest,
    ) -> Result<Client> {
        let mut tx = self.pool.begin().await?;

        let external_user_id = match data.external_user_id {
            Some(id) => id,
            None => {
                sqlx::query_scalar(
                    r#"
                    SELECT LEAST(COALESCE(MIN(external_user_id), 0), 0) - 1
                    FROM clients WHERE salon_id = $1
                    "#,
                )
                .bind(salon.id)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM clients WHERE salon_id = $1 AND external_user_id = $2)",
        )
        .bind(salon.id)
        .bind(external_user_id)
        .fetch_one(&mut *tx)
        .await?;
        if taken {
            return Err(AppError::Conflict(
                "A client with this external user id already exists".to_string(),
            ));
        }

        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (salon_id, external_user_id, name, phone_number)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(salon.id)
        .bind(external_user_id)
        .bind(&data.name)
        .bind(&data.phone_number)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(salon_id = salon.id, client_id = client.id, "Client created");
        Ok(client)
    }

    /// Update a client's name and phone
    pub async fn update_client(
        &self,
        salon: &Salon,
        client_id: i64,
        data: UpsertClientRequest,
    ) -> Result<Client> {
        sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients SET name = $1, phone_number = $2
            WHERE id = $3 AND salon_id = $4
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.phone_number)
        .bind(client_id)
        .bind(salon.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Client not found".to_string()))
    }

    /// Delete a client. Refused while appointments reference them.
    pub async fn delete_client(&self, salon: &Salon, client_id: i64) -> Result<()> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1 AND salon_id = $2)",
        )
        .bind(client_id)
        .bind(salon.id)
        .fetch_one(&self.pool)
        .await?;
        if !exists {
            return Err(AppError::NotFound("Client not found".to_string()));
        }

        let referencing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM appointments WHERE client_id = $1")
                .bind(client_id)
                .fetch_one(&self.pool)
                .await?;
        if referencing > 0 {
            return Err(AppError::Conflict(
                "Client has existing appointments and cannot be deleted".to_string(),
            ));
        }

        sqlx::query("DELETE FROM clients WHERE id = $1 AND salon_id = $2")
            .bind(client_id)
            .bind(salon.id)
            .execute(&self.pool)
            .await?;

        tracing::info!(salon_id = salon.id, client_id, "Client deleted");
        Ok(())
    }
}

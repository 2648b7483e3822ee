/*!
 * Salon Service Layer
 *
 * Tenant lifecycle, reachable only by the platform operator: salons are
 * created and toggled here, never deleted.
 */

use sqlx::PgPool;

use crate::models::{CreateSalonForm, Salon, UpdateSalonRequest};
use crate::utils::{AppError, Result};

/// Salon service
pub struct SalonService {
    pool: PgPool,
}

impl SalonService {
    /// Create a new salon service
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all salons, ordered by login name
    pub async fn list_salons(&self) -> Result<Vec<Salon>> {
        let salons = sqlx::query_as::<_, Salon>("SELECT * FROM salons ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(salons)
    }

    /// Create a salon. Login name and bot token are unique across the
    /// installation; the business timezone starts at the installation
    /// default.
    pub async fn create_salon(
        &self,
        data: CreateSalonForm,
        default_timezone: chrono_tz::Tz,
    ) -> Result<Salon> {
        self.assert_name_free(&data.name, None).await?;
        self.assert_token_free(&data.token, None).await?;

        let salon = sqlx::query_as::<_, Salon>(
            r#"
            INSERT INTO salons (name, title, bot_token, admin_password, is_active, timezone)
            VALUES ($1, $2, $3, $4, TRUE, $5)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.title)
        .bind(&data.token)
        .bind(&data.password)
        .bind(default_timezone.name())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(salon_id = salon.id, name = %salon.name, "Salon created");
        Ok(salon)
    }

    /// Update a salon's credentials, activation flag and timezone
    pub async fn update_salon(&self, salon_id: i64, data: UpdateSalonRequest) -> Result<Salon> {
        let existing = sqlx::query_as::<_, Salon>("SELECT * FROM salons WHERE id = $1")
            .bind(salon_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Salon not found".to_string()))?;

        self.assert_name_free(&data.name, Some(salon_id)).await?;
        self.assert_token_free(&data.bot_token, Some(salon_id)).await?;

        let timezone = match data.timezone {
            Some(timezone) => {
                timezone.parse::<chrono_tz::Tz>().map_err(|_| {
                    AppError::BadRequest(format!("'{}' is not a valid IANA timezone", timezone))
                })?;
                timezone
            }
            None => existing.timezone,
        };

        let salon = sqlx::query_as::<_, Salon>(
            r#"
            UPDATE salons
            SET name = $1, title = $2, bot_token = $3, admin_password = $4,
                is_active = $5, timezone = $6
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.title)
        .bind(&data.bot_token)
        .bind(&data.admin_password)
        .bind(data.is_active)
        .bind(&timezone)
        .bind(salon_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(salon_id, is_active = salon.is_active, "Salon updated");
        Ok(salon)
    }

    async fn assert_name_free(&self, name: &str, exclude_id: Option<i64>) -> Result<()> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM salons WHERE name = $1 AND id != COALESCE($2, -1))",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        if taken {
            return Err(AppError::Conflict(
                "A salon with this login name already exists".to_string(),
            ));
        }
        Ok(())
    }

    async fn assert_token_free(&self, token: &str, exclude_id: Option<i64>) -> Result<()> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM salons WHERE bot_token = $1 AND id != COALESCE($2, -1))",
        )
        .bind(token)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        if taken {
            return Err(AppError::Conflict(
                "A salon with this bot token already exists".to_string(),
            ));
        }
        Ok(())
    }
}

/*!
 * Catalog Service Layer
 *
 * Tenant-scoped CRUD over services, masters and the master-service
 * membership table. Every read filters by salon id and every write asserts
 * that all referenced rows belong to the authenticated salon; a foreign id
 * surfaces as 404, never as 403.
 */

use sqlx::{PgPool, Postgres, Transaction};

use crate::models::{Master, MasterDigest, Salon, Service, UpsertMasterRequest, UpsertServiceRequest};
use crate::utils::{AppError, Result};

/// Compact catalog digest consumed by the conversational front-end
#[derive(Debug, serde::Serialize)]
pub struct SalonInfo {
    pub services: Vec<ServiceDigest>,
    pub masters: Vec<MasterDigest>,
}

/// Compact service entry for the salon-info digest
#[derive(Debug, serde::Serialize, sqlx::FromRow)]
pub struct ServiceDigest {
    pub name: String,
    pub price: i32,
    pub duration_minutes: i32,
}

/// Catalog service
pub struct CatalogService {
    pool: PgPool,
}

impl CatalogService {
    /// Create a new catalog service
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all services of the salon, ordered by name
    pub async fn list_services(&self, salon: &Salon) -> Result<Vec<Service>> {
        let services = sqlx::query_as::<_, Service>(
            "SELECT * FROM services WHERE salon_id = $1 ORDER BY name",
        )
        .bind(salon.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    /// List all masters of the salon, ordered by name
    pub async fn list_masters(&self, salon: &Salon) -> Result<Vec<Master>> {
        let masters = sqlx::query_as::<_, Master>(
            "SELECT * FROM masters WHERE salon_id = $1 ORDER BY name",
        )
        .bind(salon.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(masters)
    }

    /// Fetch one service, scoped to the salon
    pub async fn get_service(&self, salon: &Salon, service_id: i64) -> Result<Service> {
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1 AND salon_id = $2")
            .bind(service_id)
            .bind(salon.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Service not found".to_string()))
    }

    /// Fetch one master, scoped to the salon
    pub async fn get_master(&self, salon: &Salon, master_id: i64) -> Result<Master> {
        sqlx::query_as::<_, Master>("SELECT * FROM masters WHERE id = $1 AND salon_id = $2")
            .bind(master_id)
            .bind(salon.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Master not found".to_string()))
    }

    /// List the masters offering a given service
    pub async fn masters_for_service(
        &self,
        salon: &Salon,
        service_id: i64,
    ) -> Result<Vec<Master>> {
        // 404 for a service outside the salon before touching memberships
        self.get_service(salon, service_id).await?;

        let masters = sqlx::query_as::<_, Master>(
            r#"
            SELECT m.* FROM masters m
            JOIN master_services ms ON ms.master_id = m.id
            WHERE ms.service_id = $1 AND m.salon_id = $2
            ORDER BY m.name
            "#,
        )
        .bind(service_id)
        .bind(salon.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(masters)
    }

    /// List the services a given master offers
    pub async fn services_of_master(&self, salon: &Salon, master_id: i64) -> Result<Vec<Service>> {
        self.get_master(salon, master_id).await?;

        let services = sqlx::query_as::<_, Service>(
            r#"
            SELECT s.* FROM services s
            JOIN master_services ms ON ms.service_id = s.id
            WHERE ms.master_id = $1 AND s.salon_id = $2
            ORDER BY s.name
            "#,
        )
        .bind(master_id)
        .bind(salon.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    /// Create a service
    pub async fn create_service(
        &self,
        salon: &Salon,
        data: UpsertServiceRequest,
    ) -> Result<Service> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (salon_id, name, price, duration_minutes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(salon.id)
        .bind(&data.name)
        .bind(data.price)
        .bind(data.duration_minutes)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(salon_id = salon.id, service_id = service.id, "Service created");
        Ok(service)
    }

    /// Update a service in place
    pub async fn update_service(
        &self,
        salon: &Salon,
        service_id: i64,
        data: UpsertServiceRequest,
    ) -> Result<Service> {
        sqlx::query_as::<_, Service>(
            r#"
            UPDATE services SET name = $1, price = $2, duration_minutes = $3
            WHERE id = $4 AND salon_id = $5
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(data.price)
        .bind(data.duration_minutes)
        .bind(service_id)
        .bind(salon.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Service not found".to_string()))
    }

    /// Delete a service. Refused while appointments reference it.
    pub async fn delete_service(&self, salon: &Salon, service_id: i64) -> Result<()> {
        self.get_service(salon, service_id).await?;

        let referencing: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM appointments WHERE service_id = $1 AND salon_id = $2",
        )
        .bind(service_id)
        .bind(salon.id)
        .fetch_one(&self.pool)
        .await?;

        if referencing > 0 {
            return Err(AppError::Conflict(
                "Service has existing appointments and cannot be deleted".to_string(),
            ));
        }

        sqlx::query("DELETE FROM services WHERE id = $1 AND salon_id = $2")
            .bind(service_id)
            .bind(salon.id)
            .execute(&self.pool)
            .await?;

        tracing::info!(salon_id = salon.id, service_id, "Service deleted");
        Ok(())
    }

    /// Create a master together with the set of services they offer
    pub async fn create_master(
        &self,
        salon: &Salon,
        data: UpsertMasterRequest,
    ) -> Result<Master> {
        let mut tx = self.pool.begin().await?;

        let master = sqlx::query_as::<_, Master>(
            r#"
            INSERT INTO masters (salon_id, name, specialization, description)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(salon.id)
        .bind(&data.name)
        .bind(&data.specialization)
        .bind(&data.description)
        .fetch_one(&mut *tx)
        .await?;

        Self::replace_membership(&mut tx, salon, master.id, &data.service_ids).await?;

        tx.commit().await?;

        tracing::info!(salon_id = salon.id, master_id = master.id, "Master created");
        Ok(master)
    }

    /// Update a master and replace their service membership set
    pub async fn update_master(
        &self,
        salon: &Salon,
        master_id: i64,
        data: UpsertMasterRequest,
    ) -> Result<Master> {
        let mut tx = self.pool.begin().await?;

        let master = sqlx::query_as::<_, Master>(
            r#"
            UPDATE masters SET name = $1, specialization = $2, description = $3
            WHERE id = $4 AND salon_id = $5
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.specialization)
        .bind(&data.description)
        .bind(master_id)
        .bind(salon.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Master not found".to_string()))?;

        Self::replace_membership(&mut tx, salon, master.id, &data.service_ids).await?;

        tx.commit().await?;

        Ok(master)
    }

    /// Delete a master. Refused while appointments reference them; otherwise
    /// membership and schedule rows cascade away.
    pub async fn delete_master(&self, salon: &Salon, master_id: i64) -> Result<()> {
        self.get_master(salon, master_id).await?;

        let referencing: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM appointments WHERE master_id = $1 AND salon_id = $2",
        )
        .bind(master_id)
        .bind(salon.id)
        .fetch_one(&self.pool)
        .await?;

        if referencing > 0 {
            return Err(AppError::Conflict(
                "Master has existing appointments and cannot be deleted".to_string(),
            ));
        }

        sqlx::query("DELETE FROM masters WHERE id = $1 AND salon_id = $2")
            .bind(master_id)
            .bind(salon.id)
            .execute(&self.pool)
            .await?;

        tracing::info!(salon_id = salon.id, master_id, "Master deleted");
        Ok(())
    }

    /// Build the compact catalog digest for the conversational front-end
    pub async fn salon_info(&self, salon: &Salon) -> Result<SalonInfo> {
        let services = sqlx::query_as::<_, ServiceDigest>(
            "SELECT name, price, duration_minutes FROM services WHERE salon_id = $1 ORDER BY name",
        )
        .bind(salon.id)
        .fetch_all(&self.pool)
        .await?;

        let masters = self.list_masters(salon).await?;

        let mut digests = Vec::with_capacity(masters.len());
        for master in masters {
            let offered: Vec<String> = sqlx::query_scalar(
                r#"
                SELECT s.name FROM services s
                JOIN master_services ms ON ms.service_id = s.id
                WHERE ms.master_id = $1
                ORDER BY s.name
                "#,
            )
            .bind(master.id)
            .fetch_all(&self.pool)
            .await?;

            digests.push(MasterDigest {
                name: master.name,
                specialization: master.specialization,
                services: offered,
            });
        }

        Ok(SalonInfo {
            services,
            masters: digests,
        })
    }

    /// Replace the master's membership rows with the given service set.
    /// All ids must belong to the salon.
    async fn replace_membership(
        tx: &mut Transaction<'_, Postgres>,
        salon: &Salon,
        master_id: i64,
        service_ids: &[i64],
    ) -> Result<()> {
        sqlx::query("DELETE FROM master_services WHERE master_id = $1")
            .bind(master_id)
            .execute(&mut **tx)
            .await?;

        for service_id in service_ids {
            let owned: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM services WHERE id = $1 AND salon_id = $2)",
            )
            .bind(service_id)
            .bind(salon.id)
            .fetch_one(&mut **tx)
            .await?;

            if !owned {
                return Err(AppError::NotFound("Service not found".to_string()));
            }

            sqlx::query(
                r#"
                INSERT INTO master_services (master_id, service_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(master_id)
            .bind(service_id)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}

/*!
 * Schedule Service Layer
 *
 * Weekly working hours for masters. Reads always materialize all 7 days;
 * replacement is atomic, with entries that fail time validation skipped
 * rather than failing the whole call.
 */

use sqlx::PgPool;

use crate::models::schedule::validate_time_range;
use crate::models::{
    DayOfWeek, ReplaceScheduleRequest, Salon, Schedule, ScheduleEntry, WeeklyScheduleResponse,
};
use crate::utils::{AppError, Result};

/// Schedule service
pub struct ScheduleService {
    pool: PgPool,
}

impl ScheduleService {
    /// Create a new schedule service
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Read a master's weekly schedule as exactly 7 entries, days 1..=7.
    /// Days without a schedule row come back as non-working.
    pub async fn weekly_schedule(
        &self,
        salon: &Salon,
        master_id: i64,
    ) -> Result<WeeklyScheduleResponse> {
        self.assert_master(salon, master_id).await?;

        let rows = sqlx::query_as::<_, Schedule>(
            "SELECT * FROM schedules WHERE master_id = $1 ORDER BY day_of_week",
        )
        .bind(master_id)
        .fetch_all(&self.pool)
        .await?;

        let days = DayOfWeek::all()
            .into_iter()
            .map(|day| {
                rows.iter()
                    .find(|row| row.day_of_week == day.as_i16())
                    .map(ScheduleEntry::from)
                    .unwrap_or_else(|| ScheduleEntry::day_off(day))
            })
            .collect();

        Ok(WeeklyScheduleResponse { days })
    }

    /// Replace a master's weekly schedule atomically.
    ///
    /// The caller supplies 7 entries; existing rows are deleted and working
    /// entries re-inserted within one transaction. Entries with invalid time
    /// strings or an inverted range are skipped with a warning, and the call
    /// still succeeds for the valid remainder.
    pub async fn replace_schedule(
        &self,
        salon: &Salon,
        master_id: i64,
        data: ReplaceScheduleRequest,
    ) -> Result<WeeklyScheduleResponse> {
        self.assert_master(salon, master_id).await?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM schedules WHERE master_id = $1")
            .bind(master_id)
            .execute(&mut *tx)
            .await?;

        for entry in &data.items {
            if !entry.is_working {
                continue;
            }
            let Some(day) = DayOfWeek::from_i16(entry.day_of_week) else {
                tracing::warn!(
                    master_id,
                    day_of_week = entry.day_of_week,
                    "Skipping schedule entry with invalid day of week"
                );
                continue;
            };
            let (start, end) = match validate_time_range(&entry.start_time, &entry.end_time) {
                Ok(bounds) => bounds,
                Err(reason) => {
                    tracing::warn!(
                        master_id,
                        day_of_week = entry.day_of_week,
                        %reason,
                        "Skipping schedule entry with invalid working hours"
                    );
                    continue;
                }
            };

            sqlx::query(
                r#"
                INSERT INTO schedules (master_id, day_of_week, start_time, end_time)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (master_id, day_of_week)
                DO UPDATE SET start_time = EXCLUDED.start_time, end_time = EXCLUDED.end_time
                "#,
            )
            .bind(master_id)
            .bind(day.as_i16())
            .bind(start)
            .bind(end)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(salon_id = salon.id, master_id, "Weekly schedule replaced");

        self.weekly_schedule(salon, master_id).await
    }

    /// 404 for masters outside the salon
    async fn assert_master(&self, salon: &Salon, master_id: i64) -> Result<()> {
        let owned: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM masters WHERE id = $1 AND salon_id = $2)",
        )
        .bind(master_id)
        .bind(salon.id)
        .fetch_one(&self.pool)
        .await?;

        if !owned {
            return Err(AppError::NotFound("Master not found".to_string()));
        }
        Ok(())
    }
}

/*!
 * Availability Service Layer
 *
 * Computes bookable slots for (service, master?, date) and the active days
 * of a month. Reads run at the pool's default isolation; staleness is
 * acceptable because the booking engine re-verifies every write under its
 * own serialization.
 */

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use sqlx::PgPool;

use crate::models::{Appointment, AvailableSlot, DayOfWeek, Master, Salon, Schedule, Service};
use crate::services::slot_grid::{free_starts, initial_slot_start, overlaps, BusyInterval};
use crate::utils::{AppError, Result};

/// Availability service
pub struct AvailabilityService {
    pool: PgPool,
    grid_minutes: u32,
}

impl AvailabilityService {
    /// Create a new availability service
    pub fn new(pool: PgPool, grid_minutes: u32) -> Self {
        Self { pool, grid_minutes }
    }

    /// Compute bookable slots for the salon on `selected_date`.
    ///
    /// Candidate masters are those offering the service, optionally narrowed
    /// to one requested master. When the requesting chat user is known,
    /// slots colliding with their own appointments that day are dropped
    /// regardless of master.
    ///
    /// # Errors
    ///
    /// 404 when the service does not exist in the salon.
    pub async fn available_slots(
        &self,
        salon: &Salon,
        service_id: i64,
        selected_date: NaiveDate,
        master_id: Option<i64>,
        external_user_id: Option<i64>,
    ) -> Result<Vec<AvailableSlot>> {
        let service = sqlx::query_as::<_, Service>(
            "SELECT * FROM services WHERE id = $1 AND salon_id = $2",
        )
        .bind(service_id)
        .bind(salon.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;

        let client_busy = self
            .client_appointments_for_day(salon, external_user_id, selected_date)
            .await?;

        let masters = self
            .candidate_masters(salon, service_id, master_id)
            .await?;
        if masters.is_empty() {
            return Ok(Vec::new());
        }

        let day_of_week = DayOfWeek::from_date(selected_date);
        // Same-day cutoff happens in the salon's business timezone.
        let now: NaiveDateTime = Utc::now()
            .with_timezone(&salon.business_timezone())
            .naive_local();
        let duration = i64::from(service.duration_minutes);

        let mut all_slots: Vec<(NaiveDateTime, i64)> = Vec::new();

        for master in &masters {
            let schedule = sqlx::query_as::<_, Schedule>(
                "SELECT * FROM schedules WHERE master_id = $1 AND day_of_week = $2",
            )
            .bind(master.id)
            .bind(day_of_week.as_i16())
            .fetch_optional(&self.pool)
            .await?;

            let Some(schedule) = schedule else {
                continue;
            };

            let busy = self
                .master_appointments_for_day(master.id, selected_date)
                .await?;

            let first_start =
                initial_slot_start(selected_date, schedule.start_time, now, self.grid_minutes);
            for start in free_starts(
                selected_date,
                first_start,
                schedule.end_time,
                duration,
                self.grid_minutes,
                &busy,
            ) {
                all_slots.push((start, master.id));
            }
        }

        // Requesting client must be free across all masters.
        let slot_duration = Duration::minutes(duration);
        all_slots.retain(|(start, _)| {
            !client_busy
                .iter()
                .any(|appt| overlaps(*start, *start + slot_duration, appt.start, appt.end))
        });

        all_slots.sort_by_key(|(start, _)| start.time());

        Ok(all_slots
            .into_iter()
            .map(|(start, master_id)| AvailableSlot {
                time: start.format("%H:%M").to_string(),
                master_id,
            })
            .collect())
    }

    /// Days of (year, month) from today onwards with at least one bookable
    /// slot. Invalid (year, month) yields an empty list, not an error.
    pub async fn active_days_in_month(
        &self,
        salon: &Salon,
        service_id: i64,
        year: i32,
        month: u32,
        master_id: Option<i64>,
        external_user_id: Option<i64>,
    ) -> Result<Vec<u32>> {
        let Some(num_days) = days_in_month(year, month) else {
            return Ok(Vec::new());
        };

        let today = Utc::now()
            .with_timezone(&salon.business_timezone())
            .date_naive();

        let mut active_days = Vec::new();
        for day in 1..=num_days {
            // from_ymd_opt cannot fail here; the month length is known
            let Some(current_date) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };
            if current_date < today {
                continue;
            }
            let slots = self
                .available_slots(salon, service_id, current_date, master_id, external_user_id)
                .await?;
            if !slots.is_empty() {
                active_days.push(day);
            }
        }

        Ok(active_days)
    }

    /// Masters of the salon offering the service, optionally narrowed to one
    async fn candidate_masters(
        &self,
        salon: &Salon,
        service_id: i64,
        master_id: Option<i64>,
    ) -> Result<Vec<Master>> {
        let masters = if let Some(master_id) = master_id {
            sqlx::query_as::<_, Master>(
                r#"
                SELECT m.* FROM masters m
                JOIN master_services ms ON ms.master_id = m.id
                WHERE m.salon_id = $1 AND ms.service_id = $2 AND m.id = $3
                "#,
            )
            .bind(salon.id)
            .bind(service_id)
            .bind(master_id)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, Master>(
                r#"
                SELECT m.* FROM masters m
                JOIN master_services ms ON ms.master_id = m.id
                WHERE m.salon_id = $1 AND ms.service_id = $2
                ORDER BY m.id
                "#,
            )
            .bind(salon.id)
            .bind(service_id)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(masters)
    }

    /// Busy intervals of one master within the calendar day
    async fn master_appointments_for_day(
        &self,
        master_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<BusyInterval>> {
        let (day_start, day_end) = day_bounds(date);

        let appointments = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT * FROM appointments
            WHERE master_id = $1 AND start_time >= $2 AND start_time < $3
            "#,
        )
        .bind(master_id)
        .bind(day_start)
        .bind(day_end)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments
            .iter()
            .map(|appt| BusyInterval {
                start: appt.start_time,
                end: appt.end_time,
            })
            .collect())
    }

    /// Busy intervals of the requesting client within the calendar day,
    /// across all masters. Unknown clients have none.
    async fn client_appointments_for_day(
        &self,
        salon: &Salon,
        external_user_id: Option<i64>,
        date: NaiveDate,
    ) -> Result<Vec<BusyInterval>> {
        let Some(external_user_id) = external_user_id else {
            return Ok(Vec::new());
        };

        let (day_start, day_end) = day_bounds(date);

        let appointments = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT a.* FROM appointments a
            JOIN clients c ON c.id = a.client_id
            WHERE c.salon_id = $1 AND c.external_user_id = $2
              AND a.start_time >= $3 AND a.start_time < $4
            "#,
        )
        .bind(salon.id)
        .bind(external_user_id)
        .bind(day_start)
        .bind(day_end)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments
            .iter()
            .map(|appt| BusyInterval {
                start: appt.start_time,
                end: appt.end_time,
            })
            .collect())
    }
}

/// Half-open bounds of a calendar day
fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(chrono::NaiveTime::MIN);
    (start, start + Duration::days(1))
}

/// Number of days in (year, month), or None when the month is invalid
fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next_first.signed_duration_since(first).num_days() as u32)
}

/*!
 * Booking Service Layer
 *
 * Creates, reschedules and cancels appointments. Every booking write runs
 * its conflict checks and its row mutation inside one transaction holding
 * advisory locks keyed by the master (and, on creation, the client), so two
 * racing requests for the same subject serialize and exactly one succeeds.
 */

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::{
    AdminCreateAppointmentRequest, AppointmentSummary, Client, CreateAppointmentRequest,
    DayOfWeek, Master, NaturalAppointmentRequest, Salon, Schedule, Service,
    UpdateAppointmentRequest,
};
use crate::utils::{AppError, Result};

/// Conflict message when the master already has an overlapping appointment
pub const MASTER_BUSY_MESSAGE: &str =
    "This time slot has just been booked. Please choose another time.";
/// Conflict message when the client already has an overlapping appointment
pub const CLIENT_BUSY_MESSAGE: &str = "You already have another appointment at this time.";
/// Conflict message when the requested interval leaves the master's schedule
pub const OUTSIDE_SCHEDULE_MESSAGE: &str =
    "The requested time is outside the master's working hours.";

/// Name given to client rows created through the phone-update path before
/// the client has ever introduced themselves
const PLACEHOLDER_CLIENT_NAME: &str = "Client";

// Advisory lock keys partition the bigint key space by subject kind.
const MASTER_LOCK_CLASS: i64 = 1 << 40;
const CLIENT_LOCK_CLASS: i64 = 2 << 40;

/// Booking service
pub struct BookingService {
    pool: PgPool,
}

impl BookingService {
    /// Create a new booking service
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an appointment on behalf of a chat user.
    ///
    /// The client row is created on first booking, keyed by the chat
    /// platform user id.
    pub async fn create_from_bot(
        &self,
        salon: &Salon,
        data: CreateAppointmentRequest,
    ) -> Result<AppointmentSummary> {
        let client = self
            .upsert_client(salon, data.external_user_id, &data.user_name)
            .await?;
        let service = self.load_service(salon, data.service_id).await?;
        let master = self.load_master(salon, data.master_id).await?;

        self.book(salon, &client, &master, &service, data.start_time)
            .await
    }

    /// Create an appointment for an already-known client (admin path)
    pub async fn create_from_admin(
        &self,
        salon: &Salon,
        data: AdminCreateAppointmentRequest,
    ) -> Result<AppointmentSummary> {
        let client = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE id = $1 AND salon_id = $2",
        )
        .bind(data.client_id)
        .bind(salon.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;

        let service = self.load_service(salon, data.service_id).await?;
        let master = self.load_master(salon, data.master_id).await?;

        self.book(salon, &client, &master, &service, data.start_time)
            .await
    }

    /// Create an appointment from human-entered catalog names and date/time
    /// strings. Matching is a deliberately loose case-insensitive substring
    /// search; disambiguation is the caller's responsibility.
    pub async fn create_from_natural(
        &self,
        salon: &Salon,
        data: NaturalAppointmentRequest,
    ) -> Result<AppointmentSummary> {
        tracing::info!(
            salon_id = salon.id,
            external_user_id = data.external_user_id,
            service_name = %data.service_name,
            "Natural-language booking request"
        );

        let client = self
            .upsert_client(salon, data.external_user_id, &data.user_name)
            .await?;

        let service = sqlx::query_as::<_, Service>(
            r#"
            SELECT * FROM services
            WHERE salon_id = $1 AND name ILIKE '%' || $2 || '%'
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(salon.id)
        .bind(&data.service_name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Service '{}' not found", data.service_name))
        })?;

        let master = if let Some(master_name) = &data.master_name {
            sqlx::query_as::<_, Master>(
                r#"
                SELECT * FROM masters
                WHERE salon_id = $1 AND name ILIKE '%' || $2 || '%'
                ORDER BY id
                LIMIT 1
                "#,
            )
            .bind(salon.id)
            .bind(master_name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Master '{}' not found", master_name)))?
        } else {
            sqlx::query_as::<_, Master>(
                r#"
                SELECT m.* FROM masters m
                JOIN master_services ms ON ms.master_id = m.id
                WHERE m.salon_id = $1 AND ms.service_id = $2
                ORDER BY m.id
                LIMIT 1
                "#,
            )
            .bind(salon.id)
            .bind(service.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No master offers service '{}'", service.name))
            })?
        };

        let start_time = parse_natural_datetime(&data.appointment_date, &data.appointment_time)?;

        self.book(salon, &client, &master, &service, start_time)
            .await
    }

    /// Reschedule or re-assign an appointment (admin path).
    ///
    /// The master-conflict check excludes the row being updated; the
    /// appointment keeps its client.
    pub async fn update_appointment(
        &self,
        salon: &Salon,
        appointment_id: i64,
        data: UpdateAppointmentRequest,
    ) -> Result<AppointmentSummary> {
        let service = self.load_service(salon, data.service_id).await?;
        let master = self.load_master(salon, data.master_id).await?;

        let end_time = data.start_time + Duration::minutes(i64::from(service.duration_minutes));

        let mut tx = self.pool.begin().await?;

        lock_subject(&mut tx, MASTER_LOCK_CLASS, master.id).await?;

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM appointments WHERE id = $1 AND salon_id = $2)",
        )
        .bind(appointment_id)
        .bind(salon.id)
        .fetch_one(&mut *tx)
        .await?;
        if !exists {
            return Err(AppError::NotFound("Appointment not found".to_string()));
        }

        assert_within_schedule(&mut tx, master.id, data.start_time, end_time).await?;
        assert_master_free(
            &mut tx,
            master.id,
            data.start_time,
            end_time,
            Some(appointment_id),
        )
        .await?;

        sqlx::query(
            r#"
            UPDATE appointments
            SET master_id = $1, service_id = $2, start_time = $3, end_time = $4
            WHERE id = $5 AND salon_id = $6
            "#,
        )
        .bind(master.id)
        .bind(service.id)
        .bind(data.start_time)
        .bind(end_time)
        .bind(appointment_id)
        .bind(salon.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(salon_id = salon.id, appointment_id, "Appointment updated");

        Ok(AppointmentSummary {
            id: appointment_id,
            start_time: data.start_time,
            service_name: service.name,
            master_name: master.name,
        })
    }

    /// Cancel (hard-delete) an appointment, scoped to the salon
    pub async fn cancel_appointment(&self, salon: &Salon, appointment_id: i64) -> Result<()> {
        let deleted = sqlx::query("DELETE FROM appointments WHERE id = $1 AND salon_id = $2")
            .bind(appointment_id)
            .bind(salon.id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("Appointment not found".to_string()));
        }

        tracing::info!(salon_id = salon.id, appointment_id, "Appointment cancelled");
        Ok(())
    }

    /// Future appointments of a chat user, ascending. Unknown clients have
    /// none.
    pub async fn list_client_appointments(
        &self,
        salon: &Salon,
        external_user_id: i64,
    ) -> Result<Vec<AppointmentSummary>> {
        let now: NaiveDateTime = Utc::now()
            .with_timezone(&salon.business_timezone())
            .naive_local();

        let appointments = sqlx::query_as::<_, AppointmentSummary>(
            r#"
            SELECT a.id, a.start_time, s.name AS service_name, m.name AS master_name
            FROM appointments a
            JOIN clients c ON c.id = a.client_id
            JOIN services s ON s.id = a.service_id
            JOIN masters m ON m.id = a.master_id
            WHERE c.salon_id = $1 AND c.external_user_id = $2 AND a.start_time >= $3
            ORDER BY a.start_time
            "#,
        )
        .bind(salon.id)
        .bind(external_user_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    /// Upsert a chat user's phone number, creating the client row with a
    /// placeholder name when it does not exist yet
    pub async fn update_client_phone(
        &self,
        salon: &Salon,
        external_user_id: i64,
        phone_number: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO clients (salon_id, external_user_id, name, phone_number)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (salon_id, external_user_id)
            DO UPDATE SET phone_number = EXCLUDED.phone_number
            "#,
        )
        .bind(salon.id)
        .bind(external_user_id)
        .bind(PLACEHOLDER_CLIENT_NAME)
        .bind(phone_number)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// The transactional core shared by all create paths: advisory locks,
    /// schedule coverage, master and client conflict counts, insert.
    async fn book(
        &self,
        salon: &Salon,
        client: &Client,
        master: &Master,
        service: &Service,
        start_time: NaiveDateTime,
    ) -> Result<AppointmentSummary> {
        let end_time = start_time + Duration::minutes(i64::from(service.duration_minutes));

        let mut tx = self.pool.begin().await?;

        // Master first, client second, everywhere, so lock order is total.
        lock_subject(&mut tx, MASTER_LOCK_CLASS, master.id).await?;
        lock_subject(&mut tx, CLIENT_LOCK_CLASS, client.id).await?;

        assert_within_schedule(&mut tx, master.id, start_time, end_time).await?;
        assert_master_free(&mut tx, master.id, start_time, end_time, None).await?;
        assert_client_free(&mut tx, client.id, start_time, end_time).await?;

        let appointment_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO appointments (salon_id, client_id, master_id, service_id, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(salon.id)
        .bind(client.id)
        .bind(master.id)
        .bind(service.id)
        .bind(start_time)
        .bind(end_time)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            salon_id = salon.id,
            appointment_id,
            master_id = master.id,
            client_id = client.id,
            %start_time,
            "Appointment created"
        );

        Ok(AppointmentSummary {
            id: appointment_id,
            start_time,
            service_name: service.name.clone(),
            master_name: master.name.clone(),
        })
    }

    /// Find or create the client row for a chat user. The display name is
    /// kept from first contact and not overwritten on later bookings.
    async fn upsert_client(
        &self,
        salon: &Salon,
        external_user_id: i64,
        user_name: &str,
    ) -> Result<Client> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (salon_id, external_user_id, name)
            VALUES ($1, $2, $3)
            ON CONFLICT (salon_id, external_user_id)
            DO UPDATE SET name = COALESCE(clients.name, EXCLUDED.name)
            RETURNING *
            "#,
        )
        .bind(salon.id)
        .bind(external_user_id)
        .bind(user_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(client)
    }

    async fn load_service(&self, salon: &Salon, service_id: i64) -> Result<Service> {
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1 AND salon_id = $2")
            .bind(service_id)
            .bind(salon.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Service not found".to_string()))
    }

    async fn load_master(&self, salon: &Salon, master_id: i64) -> Result<Master> {
        sqlx::query_as::<_, Master>("SELECT * FROM masters WHERE id = $1 AND salon_id = $2")
            .bind(master_id)
            .bind(salon.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Master not found".to_string()))
    }
}

/// Take a transaction-scoped advisory lock on one subject
async fn lock_subject(
    tx: &mut Transaction<'_, Postgres>,
    class: i64,
    id: i64,
) -> Result<()> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(class + id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// The requested interval must lie within the master's schedule for that
/// day of week
async fn assert_within_schedule(
    tx: &mut Transaction<'_, Postgres>,
    master_id: i64,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
) -> Result<()> {
    let day_of_week = DayOfWeek::from_date(start_time.date());

    let schedule = sqlx::query_as::<_, Schedule>(
        "SELECT * FROM schedules WHERE master_id = $1 AND day_of_week = $2",
    )
    .bind(master_id)
    .bind(day_of_week.as_i16())
    .fetch_optional(&mut **tx)
    .await?;

    let covered = schedule.is_some_and(|schedule| {
        within_window(
            start_time,
            end_time,
            schedule.start_time,
            schedule.end_time,
        )
    });

    if !covered {
        return Err(AppError::Conflict(OUTSIDE_SCHEDULE_MESSAGE.to_string()));
    }
    Ok(())
}

/// Count overlapping appointments of the master, optionally excluding one
/// row (the appointment being rescheduled)
async fn assert_master_free(
    tx: &mut Transaction<'_, Postgres>,
    master_id: i64,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    exclude_id: Option<i64>,
) -> Result<()> {
    let conflicting: i64 = if let Some(exclude_id) = exclude_id {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM appointments
            WHERE master_id = $1 AND id != $2 AND start_time < $3 AND end_time > $4
            "#,
        )
        .bind(master_id)
        .bind(exclude_id)
        .bind(end_time)
        .bind(start_time)
        .fetch_one(&mut **tx)
        .await?
    } else {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM appointments
            WHERE master_id = $1 AND start_time < $2 AND end_time > $3
            "#,
        )
        .bind(master_id)
        .bind(end_time)
        .bind(start_time)
        .fetch_one(&mut **tx)
        .await?
    };

    if conflicting > 0 {
        return Err(AppError::Conflict(MASTER_BUSY_MESSAGE.to_string()));
    }
    Ok(())
}

/// Count overlapping appointments of the client, regardless of master
async fn assert_client_free(
    tx: &mut Transaction<'_, Postgres>,
    client_id: i64,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
) -> Result<()> {
    let conflicting: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM appointments
        WHERE client_id = $1 AND start_time < $2 AND end_time > $3
        "#,
    )
    .bind(client_id)
    .bind(end_time)
    .bind(start_time)
    .fetch_one(&mut **tx)
    .await?;

    if conflicting > 0 {
        return Err(AppError::Conflict(CLIENT_BUSY_MESSAGE.to_string()));
    }
    Ok(())
}

/// True when `[start, end)` lies within the working window on start's date
fn within_window(
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    window_start: NaiveTime,
    window_end: NaiveTime,
) -> bool {
    if end_time.date() != start_time.date() {
        // An interval crossing midnight cannot fit a same-day window
        return false;
    }
    start_time.time() >= window_start && end_time.time() <= window_end
}

/// Parse the natural endpoint's date and time strings into a wall-clock
/// datetime
fn parse_natural_datetime(date_str: &str, time_str: &str) -> Result<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d");
    let time = NaiveTime::parse_from_str(time_str, "%H:%M");
    match (date, time) {
        (Ok(date), Ok(time)) => Ok(date.and_time(time)),
        _ => Err(AppError::BadRequest(
            "Invalid date or time format. Use YYYY-MM-DD and HH:MM.".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 14)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_within_window_accepts_exact_bounds() {
        assert!(within_window(dt(10, 0), dt(11, 0), t(10, 0), t(11, 0)));
        assert!(within_window(dt(12, 0), dt(13, 0), t(10, 0), t(13, 0)));
    }

    #[test]
    fn test_within_window_rejects_spill() {
        assert!(!within_window(dt(9, 45), dt(10, 45), t(10, 0), t(19, 0)));
        assert!(!within_window(dt(18, 30), dt(19, 30), t(10, 0), t(19, 0)));
    }

    #[test]
    fn test_within_window_rejects_midnight_crossing() {
        let start = dt(23, 30);
        let end = start + Duration::minutes(60);
        assert!(!within_window(start, end, t(0, 0), t(23, 59)));
    }

    #[test]
    fn test_parse_natural_datetime() {
        let parsed = parse_natural_datetime("2025-04-14", "10:00").unwrap();
        assert_eq!(parsed, dt(10, 0));
    }

    #[test]
    fn test_parse_natural_datetime_rejects_garbage() {
        assert!(parse_natural_datetime("14.04.2025", "10:00").is_err());
        assert!(parse_natural_datetime("2025-04-14", "10 am").is_err());
        assert!(parse_natural_datetime("2025-13-40", "10:00").is_err());
    }

    #[test]
    fn test_conflict_messages_are_distinct() {
        assert_ne!(MASTER_BUSY_MESSAGE, CLIENT_BUSY_MESSAGE);
        assert_ne!(MASTER_BUSY_MESSAGE, OUTSIDE_SCHEDULE_MESSAGE);
    }

    #[test]
    fn test_lock_classes_do_not_collide() {
        // Same numeric id must map to different advisory keys per class.
        assert_ne!(MASTER_LOCK_CLASS + 5, CLIENT_LOCK_CLASS + 5);
    }
}

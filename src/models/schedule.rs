/*!
 * Schedule Model
 *
 * Weekly working hours for a master, at most one row per day of week.
 *
 * Uses ISO 8601 convention: Monday = 1, Sunday = 7
 */

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Day of week using ISO 8601 convention (Monday = 1, Sunday = 7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Sunday = 7,
}

impl DayOfWeek {
    /// Convert from database integer
    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            1 => Some(DayOfWeek::Monday),
            2 => Some(DayOfWeek::Tuesday),
            3 => Some(DayOfWeek::Wednesday),
            4 => Some(DayOfWeek::Thursday),
            5 => Some(DayOfWeek::Friday),
            6 => Some(DayOfWeek::Saturday),
            7 => Some(DayOfWeek::Sunday),
            _ => None,
        }
    }

    /// Convert to database integer
    pub fn as_i16(&self) -> i16 {
        *self as i16
    }

    /// Day of week a calendar date falls on
    pub fn from_date(date: NaiveDate) -> Self {
        // number_from_monday is 1..=7, always convertible
        Self::from_i16(date.weekday().number_from_monday() as i16).unwrap_or(DayOfWeek::Monday)
    }

    /// Get all days of the week in order (Monday first)
    pub fn all() -> Vec<Self> {
        vec![
            DayOfWeek::Monday,
            DayOfWeek::Tuesday,
            DayOfWeek::Wednesday,
            DayOfWeek::Thursday,
            DayOfWeek::Friday,
            DayOfWeek::Saturday,
            DayOfWeek::Sunday,
        ]
    }
}

/// Schedule database model
#[derive(Debug, Clone, FromRow)]
pub struct Schedule {
    pub id: i64,
    pub master_id: i64,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// One day's entry in a weekly schedule, as exchanged with the admin UI.
/// Non-working days carry empty time strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub day_of_week: i16,
    pub is_working: bool,
    pub start_time: String,
    pub end_time: String,
}

impl ScheduleEntry {
    /// Entry for a day the master does not work
    pub fn day_off(day: DayOfWeek) -> Self {
        Self {
            day_of_week: day.as_i16(),
            is_working: false,
            start_time: String::new(),
            end_time: String::new(),
        }
    }
}

impl From<&Schedule> for ScheduleEntry {
    fn from(row: &Schedule) -> Self {
        Self {
            day_of_week: row.day_of_week,
            is_working: true,
            start_time: row.start_time.format("%H:%M").to_string(),
            end_time: row.end_time.format("%H:%M").to_string(),
        }
    }
}

/// Full weekly schedule: exactly 7 entries, days 1..=7 in order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyScheduleResponse {
    pub days: Vec<ScheduleEntry>,
}

/// Request to replace a master's weekly schedule
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReplaceScheduleRequest {
    #[validate(length(min = 7, max = 7, message = "Exactly 7 day entries are required"))]
    pub items: Vec<ScheduleEntry>,
}

/// Parse a time string (HH:MM) to NaiveTime
pub fn parse_time(time_str: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(time_str, "%H:%M")
        .map_err(|_| format!("Invalid time format '{}'. Expected HH:MM", time_str))
}

/// Validate a working-hours range, returning the parsed bounds
pub fn validate_time_range(start: &str, end: &str) -> Result<(NaiveTime, NaiveTime), String> {
    let start_time = parse_time(start)?;
    let end_time = parse_time(end)?;
    if end_time <= start_time {
        return Err("End time must be after start time".to_string());
    }
    Ok((start_time, end_time))
}

/*!
 * Slot Grid
 *
 * Pure slot arithmetic for the availability engine: candidate-start
 * generation on a fixed minute grid, the same-day lower bound, and the
 * half-open interval overlap test shared with the booking engine.
 */

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// A busy `[start, end)` interval (an existing appointment)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Half-open interval overlap: `max(a.start, b.start) < min(a.end, b.end)`.
/// Touching intervals (one ends exactly where the other starts) do not
/// overlap.
pub fn overlaps(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start.max(b_start) < a_end.min(b_end)
}

/// Round a timestamp up to the next multiple of the grid step within the
/// hour, clearing seconds. A timestamp already on the grid is unchanged.
pub fn round_up_to_grid(t: NaiveDateTime, grid_minutes: u32) -> NaiveDateTime {
    let t = t
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t);
    let rem = t.minute() % grid_minutes;
    if rem == 0 {
        t
    } else {
        t + Duration::minutes((grid_minutes - rem) as i64)
    }
}

/// First candidate start for a working window beginning at `window_start` on
/// `date`. When `now` falls on the same date, starts at or before `now` are
/// unusable, so the bound is pushed to `now` rounded up to the grid.
pub fn initial_slot_start(
    date: NaiveDate,
    window_start: NaiveTime,
    now: NaiveDateTime,
    grid_minutes: u32,
) -> NaiveDateTime {
    let mut slot_start = date.and_time(window_start);
    if date == now.date() && now > slot_start {
        slot_start = round_up_to_grid(now, grid_minutes);
    }
    slot_start
}

/// Candidate starts for one master's working window: stepped by the grid
/// from `first_start` while the whole service still fits before
/// `window_end`, keeping only starts whose `[start, start+duration)` does
/// not overlap any busy interval.
pub fn free_starts(
    date: NaiveDate,
    first_start: NaiveDateTime,
    window_end: NaiveTime,
    duration_minutes: i64,
    grid_minutes: u32,
    busy: &[BusyInterval],
) -> Vec<NaiveDateTime> {
    let duration = Duration::minutes(duration_minutes);
    let step = Duration::minutes(grid_minutes as i64);
    let workday_end = date.and_time(window_end);

    let mut slots = Vec::new();
    let mut slot_start = first_start;

    while slot_start + duration <= workday_end {
        let slot_end = slot_start + duration;
        let is_free = !busy
            .iter()
            .any(|appt| overlaps(slot_start, slot_end, appt.start, appt.end));
        if is_free {
            slots.push(slot_start);
        }
        slot_start += step;
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 14).unwrap()
    }

    fn dt(h: u32, m: u32) -> NaiveDateTime {
        date().and_hms_opt(h, m, 0).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_touching_intervals_do_not_overlap() {
        assert!(!overlaps(dt(10, 0), dt(11, 0), dt(11, 0), dt(12, 0)));
        assert!(!overlaps(dt(11, 0), dt(12, 0), dt(10, 0), dt(11, 0)));
    }

    #[test]
    fn test_nested_and_partial_overlap() {
        assert!(overlaps(dt(10, 0), dt(12, 0), dt(10, 30), dt(11, 0)));
        assert!(overlaps(dt(10, 0), dt(11, 0), dt(10, 30), dt(11, 30)));
        assert!(overlaps(dt(10, 0), dt(11, 0), dt(10, 0), dt(11, 0)));
    }

    #[test]
    fn test_round_up_to_grid() {
        assert_eq!(round_up_to_grid(dt(10, 7), 15), dt(10, 15));
        assert_eq!(round_up_to_grid(dt(10, 15), 15), dt(10, 15));
        assert_eq!(round_up_to_grid(dt(10, 0), 15), dt(10, 0));
        assert_eq!(round_up_to_grid(dt(10, 46), 15), dt(11, 0));
        assert_eq!(round_up_to_grid(dt(10, 7), 30), dt(10, 30));
    }

    #[test]
    fn test_round_up_clears_seconds() {
        let with_seconds = date().and_hms_opt(10, 15, 42).unwrap();
        assert_eq!(round_up_to_grid(with_seconds, 15), dt(10, 15));
    }

    #[test]
    fn test_initial_start_before_window_keeps_window_start() {
        // now is earlier in the day than the window opens
        let first = initial_slot_start(date(), t(10, 0), dt(8, 30), 15);
        assert_eq!(first, dt(10, 0));
    }

    #[test]
    fn test_initial_start_today_rounds_now_up() {
        let first = initial_slot_start(date(), t(10, 0), dt(10, 7), 15);
        assert_eq!(first, dt(10, 15));
    }

    #[test]
    fn test_initial_start_other_day_ignores_now() {
        let tomorrow = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();
        let first = initial_slot_start(tomorrow, t(10, 0), dt(10, 7), 15);
        assert_eq!(first, tomorrow.and_time(t(10, 0)));
    }

    #[test]
    fn test_grid_and_today_cutoff() {
        // Duration 60, window 10:00-13:00, now 10:07: grid starts at 10:15
        // and the last start leaves the full hour before 13:00.
        let first = initial_slot_start(date(), t(10, 0), dt(10, 7), 15);
        let slots = free_starts(date(), first, t(13, 0), 60, 15, &[]);
        let rendered: Vec<String> = slots
            .iter()
            .map(|s| s.format("%H:%M").to_string())
            .collect();
        assert_eq!(
            rendered,
            vec!["10:15", "10:30", "10:45", "11:00", "11:15", "11:30", "11:45", "12:00"]
        );
    }

    #[test]
    fn test_busy_interval_blocks_overlapping_starts() {
        let busy = [BusyInterval {
            start: dt(11, 0),
            end: dt(12, 0),
        }];
        let slots = free_starts(date(), dt(10, 0), t(13, 0), 60, 15, &busy);
        let rendered: Vec<String> = slots
            .iter()
            .map(|s| s.format("%H:%M").to_string())
            .collect();
        // 10:00 ends exactly at the busy start and 12:00 starts exactly at
        // its end; everything in between collides.
        assert_eq!(rendered, vec!["10:00", "12:00"]);
    }

    #[test]
    fn test_service_longer_than_window_yields_nothing() {
        let slots = free_starts(date(), dt(10, 0), t(11, 0), 90, 15, &[]);
        assert!(slots.is_empty());
    }

    #[test]
    fn test_exact_fit_single_slot() {
        let slots = free_starts(date(), dt(10, 0), t(11, 0), 60, 15, &[]);
        assert_eq!(slots, vec![dt(10, 0)]);
    }

    #[test]
    fn test_thirty_minute_grid() {
        let slots = free_starts(date(), dt(10, 0), t(12, 0), 60, 30, &[]);
        assert_eq!(slots, vec![dt(10, 0), dt(10, 30), dt(11, 0)]);
    }
}

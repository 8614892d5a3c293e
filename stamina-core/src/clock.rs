//! Time-of-day helpers and the clock abstraction.
//!
//! Instants are local wall-clock [`NaiveDateTime`] values: the planner follows
//! the device clock and never synchronizes with an authoritative source.

use chrono::{Duration as ChronoDuration, Local, NaiveDateTime};
use num_traits::cast::cast;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::constants::{MINUTES_PER_DAY, MINUTES_PER_HOUR};
use crate::numbers::parse_number;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;
const INSTANT_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Source of the current local time.
pub trait Clock {
    /// Current local wall-clock instant.
    fn now(&self) -> NaiveDateTime;
}

/// Clock backed by the operating system's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Shared, adjustable clock. Clones observe the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<NaiveDateTime>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Jump to an absolute instant.
    pub fn set(&self, instant: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }

    /// Move the clock forward by whole minutes.
    pub fn advance_minutes(&self, minutes: i64) {
        let mut guard = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *guard += ChronoDuration::minutes(minutes);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Zero-padded 24-hour `HH:MM` for the given instant.
#[must_use]
pub fn format_time(instant: NaiveDateTime) -> String {
    instant.format("%H:%M").to_string()
}

/// Local calendar-day key (`YYYY-MM-DD`) used as the reset boundary.
#[must_use]
pub fn date_key(instant: NaiveDateTime) -> String {
    instant.format("%Y-%m-%d").to_string()
}

/// Minutes since midnight for an `HH:MM` string, clamped to `[0, 1440]`.
///
/// Returns 0 when either component is not a finite number. Components past
/// the second are ignored and a missing minute component reads as invalid.
#[must_use]
pub fn parse_minutes(value: &str) -> i64 {
    let mut parts = value.split(':');
    let hours = parts.next().map_or(f64::NAN, parse_number);
    let minutes = parts.next().map_or(f64::NAN, parse_number);
    if !hours.is_finite() || !minutes.is_finite() {
        return 0;
    }
    let total = hours.mul_add(60.0, minutes).floor();
    let ceiling = cast::<i64, f64>(MINUTES_PER_DAY).unwrap_or(1440.0);
    cast::<f64, i64>(total.clamp(0.0, ceiling)).unwrap_or(0)
}

/// `HH:MM` for a minute count. Does not wrap: reduce modulo a day first.
#[must_use]
pub fn format_minutes_to_time(total_minutes: i64) -> String {
    let hours = total_minutes.div_euclid(MINUTES_PER_HOUR);
    let minutes = total_minutes.rem_euclid(MINUTES_PER_HOUR);
    format!("{hours:02}:{minutes:02}")
}

/// Wall-clock time remaining until the next local midnight.
#[must_use]
pub fn until_next_midnight(now: NaiveDateTime) -> Duration {
    now.date()
        .succ_opt()
        .and_then(|tomorrow| tomorrow.and_hms_opt(0, 0, 0))
        .and_then(|midnight| (midnight - now).to_std().ok())
        .unwrap_or(Duration::from_secs(SECONDS_PER_DAY))
}

/// Parse a local instant such as `2026-10-18T09:30`.
#[must_use]
pub fn parse_local_instant(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    INSTANT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 9)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .expect("valid instant")
    }

    #[test]
    fn format_time_zero_pads() {
        assert_eq!(format_time(at(7, 5)), "07:05");
        assert_eq!(format_time(at(23, 59)), "23:59");
        assert_eq!(date_key(at(0, 0)), "2026-03-09");
    }

    #[test]
    fn parse_minutes_handles_malformed_input() {
        assert_eq!(parse_minutes("10:30"), 630);
        assert_eq!(parse_minutes("00:00"), 0);
        assert_eq!(parse_minutes("24:00"), 1440);
        assert_eq!(parse_minutes("25:00"), 1440);
        assert_eq!(parse_minutes("-1:00"), 0);
        assert_eq!(parse_minutes("ab:cd"), 0);
        assert_eq!(parse_minutes("10"), 0);
        assert_eq!(parse_minutes("10:30:59"), 630);
    }

    #[test]
    fn every_valid_time_round_trips() {
        for minutes in 0..MINUTES_PER_DAY {
            let text = format_minutes_to_time(minutes);
            assert_eq!(
                format_minutes_to_time(parse_minutes(&text) % MINUTES_PER_DAY),
                text
            );
        }
        assert_eq!(format_minutes_to_time(1440), "24:00");
    }

    #[test]
    fn midnight_delay_counts_to_next_day() {
        assert_eq!(until_next_midnight(at(23, 59)), Duration::from_secs(60));
        assert_eq!(
            until_next_midnight(at(0, 0)),
            Duration::from_secs(SECONDS_PER_DAY)
        );
    }

    #[test]
    fn manual_clock_shares_instant_across_clones() {
        let clock = ManualClock::new(at(9, 0));
        let observer = clock.clone();
        clock.advance_minutes(30);
        assert_eq!(observer.now(), at(9, 30));
        clock.set(at(1, 0));
        assert_eq!(observer.now(), at(1, 0));
    }

    #[test]
    fn local_instants_parse_in_several_layouts() {
        assert_eq!(parse_local_instant("2026-03-09T07:05"), Some(at(7, 5)));
        assert_eq!(parse_local_instant("2026-03-09 07:05:00"), Some(at(7, 5)));
        assert_eq!(parse_local_instant("yesterday"), None);
    }
}

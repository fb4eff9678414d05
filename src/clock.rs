//! # Wall clock, time parsing and duration formatting.
//!
//! Restart targets are absolute UTC instants ([`DateTime<Utc>`]). The countdown
//! itself never looks at the wall clock after arming: it converts the target into
//! whole seconds once and then sleeps on [`tokio::time`], which tests can pause.
//!
//! ## Accepted time strings
//! ```text
//! "300"       → now + 300s            (relative cooldown)
//! "04:00:00"  → next 04:00:00 UTC     (today if still ahead, otherwise tomorrow)
//! anything else → RestartError::InvalidTimeFormat
//! ```

use chrono::{DateTime, Duration as ChronoDuration, NaiveTime, Utc};

use crate::error::RestartError;

/// Fixed textual format for absolute restart times.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y - %H:%M:%S UTC";

/// Rendered instead of a duration when none is known.
pub const NO_DURATION: &str = "DNF";

/// Source of "now".
pub trait Clock: Send + Sync + 'static {
    /// Current wall-clock instant.
    fn now(&self) -> DateTime<Utc>;
}

/// [`Clock`] backed by the system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Whole seconds from `now` until `target`, rounded up, `0` if already passed.
pub fn seconds_until(now: DateTime<Utc>, target: DateTime<Utc>) -> u64 {
    let ms = (target - now).num_milliseconds();
    if ms <= 0 { 0 } else { (ms as u64).div_ceil(1000) }
}

/// Parses a cooldown (`"300"`) or a strict 24h `HH:MM:SS` time of day into an
/// absolute instant relative to `now`.
///
/// A time of day earlier than or equal to `now`'s time of day resolves to the
/// next calendar day.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use rebootvisor::parse_time;
///
/// let now = Utc.with_ymd_and_hms(2024, 3, 1, 5, 0, 0).unwrap();
/// let at = parse_time("04:00:00", now).unwrap();
/// assert_eq!(at, Utc.with_ymd_and_hms(2024, 3, 2, 4, 0, 0).unwrap());
/// ```
pub fn parse_time(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, RestartError> {
    let input = input.trim();

    if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
        let secs: i64 = input
            .parse()
            .map_err(|_| RestartError::invalid_time(input))?;
        return ChronoDuration::try_seconds(secs)
            .and_then(|d| now.checked_add_signed(d))
            .ok_or_else(|| RestartError::invalid_time(input));
    }

    let time = parse_clock(input).ok_or_else(|| RestartError::invalid_time(input))?;
    let today = now.date_naive().and_time(time).and_utc();
    if time <= now.time() {
        Ok(today + ChronoDuration::days(1))
    } else {
        Ok(today)
    }
}

/// Strict `HH:MM:SS`: exactly two digits per field, colon separated.
fn parse_clock(input: &str) -> Option<NaiveTime> {
    let b = input.as_bytes();
    if b.len() != 8 || b[2] != b':' || b[5] != b':' {
        return None;
    }
    let digits = [0, 1, 3, 4, 6, 7];
    if !digits.iter().all(|&i| b[i].is_ascii_digit()) {
        return None;
    }
    let field = |i: usize| u32::from(b[i] - b'0') * 10 + u32::from(b[i + 1] - b'0');
    NaiveTime::from_hms_opt(field(0), field(3), field(6))
}

/// Renders a number of seconds as `"1h 1m 1s"`, skipping zero components.
///
/// # Example
/// ```
/// use rebootvisor::format_time;
///
/// assert_eq!(format_time(Some(0)), "0s");
/// assert_eq!(format_time(Some(65)), "1m 5s");
/// assert_eq!(format_time(Some(3661)), "1h 1m 1s");
/// assert_eq!(format_time(None), "DNF");
/// ```
pub fn format_time(seconds: Option<u64>) -> String {
    let Some(seconds) = seconds else {
        return NO_DURATION.to_string();
    };

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{secs}s"));
    }
    parts.join(" ")
}

/// Renders an absolute instant as `DD/MM/YYYY - HH:MM:SS UTC`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

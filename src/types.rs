//! Shared constants and calendar conversions for the simulated clock.
//!
//! Instants are carried as `f64` seconds since the J2000 epoch
//! (2000-01-01 12:00:00 UTC, ignoring the TT/UTC offset and leap seconds).

/// Seconds per hour
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Seconds per day
pub const SECONDS_PER_DAY: f64 = 86400.0;

/// Days per Julian year
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Degrees to radians conversion factor
pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Radians to degrees conversion factor
pub const RAD_TO_DEG: f64 = 180.0 / std::f64::consts::PI;

/// J2000.0 epoch as Unix timestamp (January 1, 2000, 12:00 UTC)
pub const J2000_UNIX: i64 = 946728000;

/// Convert Unix timestamp to seconds since J2000 epoch
pub fn unix_to_j2000_seconds(unix_timestamp: i64) -> f64 {
    (unix_timestamp - J2000_UNIX) as f64
}

/// Convert J2000 seconds to Unix timestamp, rounding down to the whole second.
pub fn j2000_seconds_to_unix(j2000_seconds: f64) -> i64 {
    J2000_UNIX + j2000_seconds.floor() as i64
}

/// Get current time as J2000 seconds (using system clock).
///
/// A system clock set before 1970 reads as the Unix epoch.
pub fn current_j2000_seconds() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let unix_now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |d| d.as_secs_f64());
    unix_now - J2000_UNIX as f64
}

/// Whether `year` is a Gregorian leap year.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in the given month (1-based), or `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let days = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => return None,
    };
    Some(days)
}

/// Convert a UTC calendar date and time of day to seconds since J2000.
///
/// Returns `None` when the date does not exist or the time of day is out of range.
pub fn calendar_to_j2000_seconds(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Option<f64> {
    let max_day = days_in_month(year, month)?;
    if day == 0 || day > max_day || hour > 23 || minute > 59 || second > 59 {
        return None;
    }

    let days = ymd_to_days(year, month, day);
    let unix = days * 86400 + (hour as i64) * 3600 + (minute as i64) * 60 + second as i64;
    Some(unix_to_j2000_seconds(unix))
}

/// Format J2000 seconds as a calendar date: "YYYY-MM-DD".
pub fn format_date(j2000_seconds: f64) -> String {
    let unix_secs = j2000_seconds_to_unix(j2000_seconds);
    let (year, month, day) = days_to_ymd(unix_secs.div_euclid(86400));
    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Format J2000 seconds as a time of day: "HH:MM:SS".
pub fn format_clock(j2000_seconds: f64) -> String {
    let time_of_day = j2000_seconds_to_unix(j2000_seconds).rem_euclid(86400);
    format!(
        "{:02}:{:02}:{:02}",
        time_of_day / 3600,
        (time_of_day % 3600) / 60,
        time_of_day % 60
    )
}

/// Days since the Unix epoch for a Gregorian calendar date.
fn ymd_to_days(year: i32, month: u32, day: u32) -> i64 {
    let year = if month <= 2 { year as i64 - 1 } else { year as i64 };
    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    let month = month as i64;
    let shifted_month = if month > 2 { month - 3 } else { month + 9 };
    let day_of_year = (153 * shifted_month + 2) / 5 + day as i64 - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146097 + day_of_era - 719468
}

/// Convert days since Unix epoch to year, month, day
fn days_to_ymd(days: i64) -> (i32, u32, u32) {
    let shifted = days + 719468; // Days from year 0 to 1970
    let era = shifted.div_euclid(146097);

    let day_of_era = (shifted - era * 146097) as u32;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36524 - day_of_era / 146096) / 365;
    let year = (year_of_era as i64 + era * 400) as i32;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let mp = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = if month <= 2 { year + 1 } else { year };

    (year, month, day)
}

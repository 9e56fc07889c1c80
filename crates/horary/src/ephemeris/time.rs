//! Julian day conversions anchored on the Unix epoch.

use chrono::{DateTime, TimeZone, Utc};

/// Julian day of 1970-01-01T00:00:00Z.
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian day of J2000.0.
pub const J2000_JD: f64 = 2_451_545.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

pub fn datetime_to_julian_day(dt: DateTime<Utc>) -> f64 {
    let seconds = dt.timestamp() as f64 + dt.timestamp_subsec_nanos() as f64 / 1e9;
    UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY
}

pub fn julian_day_to_datetime(jd: f64) -> Option<DateTime<Utc>> {
    let seconds = (jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY;
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
    Utc.timestamp_opt(whole as i64, nanos).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_j2000() {
        let dt = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!((datetime_to_julian_day(dt) - J2000_JD).abs() < 1e-9);
    }

    #[test]
    fn test_round_trip_to_the_second() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 2, 17, 45, 12).unwrap();
        let back = julian_day_to_datetime(datetime_to_julian_day(dt)).unwrap();
        assert!((back - dt).num_milliseconds().abs() < 5);
    }
}

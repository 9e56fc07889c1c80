//! Sign-exit timing and the human-readable timing buckets.

use crate::western::types::normalize_degrees;

/// Longitude of the next sign boundary in the direction of motion
/// (`direction` > 0 for direct, otherwise retrograde).
pub fn sign_boundary_longitude(longitude: f64, direction: i32) -> f64 {
    let lon = normalize_degrees(longitude);
    let sign_start = (lon / 30.0).floor() * 30.0;
    if direction > 0 {
        let next = sign_start + 30.0;
        if next >= 360.0 {
            0.0
        } else {
            next
        }
    } else if lon == sign_start {
        let prev = sign_start - 30.0;
        if prev < 0.0 {
            330.0
        } else {
            prev
        }
    } else {
        sign_start
    }
}

/// Days until a body leaves its sign, honouring direction of motion.
/// `None` when the body is slower than `stationary_threshold`.
pub fn days_to_sign_exit(longitude: f64, speed: f64, stationary_threshold: f64) -> Option<f64> {
    if speed.abs() < stationary_threshold {
        return None;
    }
    let lon = normalize_degrees(longitude);
    let direction = if speed > 0.0 { 1 } else { -1 };
    let boundary = sign_boundary_longitude(lon, direction);

    let degrees = if direction > 0 {
        if boundary > lon {
            boundary - lon
        } else {
            (360.0 - lon) + boundary
        }
    } else if boundary < lon {
        lon - boundary
    } else {
        lon + (360.0 - boundary)
    };

    Some(degrees / speed.abs())
}

/// Bucket a number of days into "Within hours", "Within 3 days", ...
pub fn format_timing_description(days: f64) -> String {
    if days < 0.5 {
        "Within hours".to_string()
    } else if days < 1.0 {
        "Within a day".to_string()
    } else if days < 7.0 {
        format!("Within {} days", days as i64)
    } else if days < 30.0 {
        format!("Within {} weeks", (days / 7.0) as i64)
    } else if days < 365.0 {
        format!("Within {} months", (days / 30.0) as i64)
    } else {
        "More than a year".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stationary_has_no_exit() {
        assert_eq!(days_to_sign_exit(45.0, 0.0005, 0.001), None);
        assert_eq!(days_to_sign_exit(45.0, -0.0009, 0.001), None);
    }

    #[test]
    fn test_exit_lands_on_boundary() {
        let cases = [
            (45.0, 1.0, 60.0),
            (359.5, 13.0, 0.0),
            (45.0, -0.5, 30.0),
            (3.0, -0.2, 0.0),
            (30.0, -1.0, 0.0),
        ];
        for (lon, speed, boundary) in cases {
            let days = days_to_sign_exit(lon, speed, 0.001).unwrap();
            assert!(days >= 0.0);
            let landed = normalize_degrees(lon + speed * days);
            let miss = (landed - boundary).abs().min(360.0 - (landed - boundary).abs());
            assert!(miss < 0.01, "{lon} {speed} landed at {landed}");
        }
    }

    #[test]
    fn test_timing_buckets() {
        assert_eq!(format_timing_description(0.2), "Within hours");
        assert_eq!(format_timing_description(0.7), "Within a day");
        assert_eq!(format_timing_description(3.4), "Within 3 days");
        assert_eq!(format_timing_description(15.0), "Within 2 weeks");
        assert_eq!(format_timing_description(95.0), "Within 3 months");
        assert_eq!(format_timing_description(400.0), "More than a year");
    }
}

//! Planetary days and unequal planetary hours.

use crate::chart::types::PlanetaryHour;
use crate::ephemeris::{julian_day_to_datetime, Ephemeris, EphemerisError, GeoLocation};
use crate::western::types::Planet;
use chrono::{DateTime, Datelike, FixedOffset};

/// Descending order of planetary speed; hours cycle through it.
pub const CHALDEAN_ORDER: [Planet; 7] = [
    Planet::Saturn,
    Planet::Jupiter,
    Planet::Mars,
    Planet::Sun,
    Planet::Venus,
    Planet::Mercury,
    Planet::Moon,
];

/// Ruler of a weekday, Monday = 0.
pub fn day_ruler(weekday_from_monday: u32) -> Planet {
    match weekday_from_monday % 7 {
        0 => Planet::Moon,
        1 => Planet::Mars,
        2 => Planet::Mercury,
        3 => Planet::Jupiter,
        4 => Planet::Venus,
        5 => Planet::Saturn,
        _ => Planet::Sun,
    }
}

/// The first hour of a day belongs to the day's ruler.
pub fn hour_ruler(day_ruler: Planet, hour_index: u8) -> Planet {
    let start = CHALDEAN_ORDER.iter().position(|p| *p == day_ruler).unwrap_or(0);
    CHALDEAN_ORDER[(start + hour_index as usize) % 7]
}

/// Planetary hour at `julian_day`. The planetary day starts at local
/// sunrise. `None` when the Sun does not rise or set at this latitude.
pub fn planetary_hour<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    julian_day: f64,
    local: &DateTime<FixedOffset>,
    location: &GeoLocation,
) -> Result<Option<PlanetaryHour>, EphemerisError> {
    let Some(sunrise) = ephemeris.previous_sun_event(julian_day, location, true)? else {
        return Ok(None);
    };
    let Some(sunset) = ephemeris.next_sun_event(sunrise, location, false)? else {
        return Ok(None);
    };

    let hour_index = if julian_day < sunset {
        let hour_length = (sunset - sunrise) / 12.0;
        ((julian_day - sunrise) / hour_length) as u8
    } else {
        let Some(next_sunrise) = ephemeris.next_sun_event(julian_day, location, true)? else {
            return Ok(None);
        };
        let hour_length = (next_sunrise - sunset) / 12.0;
        12 + ((julian_day - sunset) / hour_length) as u8
    };
    let hour_index = hour_index.min(23);

    let Some(sunrise_utc) = julian_day_to_datetime(sunrise) else {
        return Ok(None);
    };
    let weekday = sunrise_utc
        .with_timezone(local.offset())
        .weekday()
        .num_days_from_monday();
    let day = day_ruler(weekday);

    Ok(Some(PlanetaryHour {
        day_ruler: day,
        hour_ruler: hour_ruler(day, hour_index),
        hour_index,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_hour_belongs_to_day_ruler() {
        for weekday in 0..7 {
            let ruler = day_ruler(weekday);
            assert_eq!(hour_ruler(ruler, 0), ruler);
        }
    }

    #[test]
    fn test_hours_roll_into_next_day() {
        // Twenty-four hours after Sunday's first hour comes Monday's ruler.
        assert_eq!(hour_ruler(Planet::Sun, 24), Planet::Moon);
        assert_eq!(hour_ruler(Planet::Saturn, 1), Planet::Jupiter);
        assert_eq!(hour_ruler(Planet::Moon, 1), Planet::Saturn);
    }
}

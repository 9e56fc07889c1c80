//! The ephemeris oracle.
//!
//! [`Ephemeris`] is the only seam through which the engine touches raw
//! astronomy. Implementors supply body positions and house cusps; the
//! provided methods derive Sun altitude, sunrise/sunset and planetary
//! stations from those two primitives.

pub mod adapter;
pub mod time;
pub mod types;

pub use adapter::SwissEphemerisAdapter;
pub use time::{datetime_to_julian_day, julian_day_to_datetime};
pub use types::{BodyPosition, GeoLocation, HouseFrame};

use crate::western::types::{normalize_degrees, Planet};
use thiserror::Error;

/// Standard altitude of the Sun's upper limb at rise and set, with refraction.
pub const SUNRISE_ALTITUDE: f64 = -0.833;

const STATION_SCAN_STEP: f64 = 0.1;
const STATION_TOLERANCE: f64 = 0.001;
const SUN_SCAN_STEP: f64 = 1.0 / 48.0;
const SUN_TOLERANCE: f64 = 1e-5;

/// Errors that can occur during ephemeris calculations
#[derive(Error, Debug)]
pub enum EphemerisError {
    #[error("Ephemeris file not found at path: {path}. {message}")]
    FileNotFound { path: String, message: String },
    #[error("Failed to calculate position for {planet} at JD {julian_day}: {message}")]
    CalculationFailed {
        planet: String,
        julian_day: f64,
        message: String,
    },
    #[error("House calculation failed: {message}")]
    HouseCalculationFailed { message: String },
}

pub trait Ephemeris {
    fn body(&self, planet: Planet, julian_day: f64) -> Result<BodyPosition, EphemerisError>;

    fn houses(&self, julian_day: f64, location: &GeoLocation) -> Result<HouseFrame, EphemerisError>;

    /// Sun's altitude above the observer's horizon in degrees.
    fn sun_altitude(&self, julian_day: f64, location: &GeoLocation) -> Result<f64, EphemerisError> {
        let sun = self.body(Planet::Sun, julian_day)?;
        Ok(ecliptic_altitude(sun.longitude, sun.latitude, julian_day, location))
    }

    /// First sunrise (or sunset) after `julian_day` within two days.
    /// `None` when the Sun does not cross the horizon, as in polar summer.
    fn next_sun_event(
        &self,
        julian_day: f64,
        location: &GeoLocation,
        rising: bool,
    ) -> Result<Option<f64>, EphemerisError> {
        let above = |jd: f64| -> Result<f64, EphemerisError> {
            Ok(self.sun_altitude(jd, location)? - SUNRISE_ALTITUDE)
        };

        let mut t0 = julian_day;
        let mut f0 = above(t0)?;
        while t0 < julian_day + 2.0 {
            let t1 = t0 + SUN_SCAN_STEP;
            let f1 = above(t1)?;
            let crossed = if rising {
                f0 < 0.0 && f1 >= 0.0
            } else {
                f0 >= 0.0 && f1 < 0.0
            };
            if crossed {
                let (mut lo, mut hi) = (t0, t1);
                while hi - lo > SUN_TOLERANCE {
                    let mid = (lo + hi) / 2.0;
                    let fm = above(mid)?;
                    if (fm >= 0.0) == rising {
                        hi = mid;
                    } else {
                        lo = mid;
                    }
                }
                return Ok(Some((lo + hi) / 2.0));
            }
            t0 = t1;
            f0 = f1;
        }
        Ok(None)
    }

    /// Last sunrise (or sunset) at or before `julian_day`.
    fn previous_sun_event(
        &self,
        julian_day: f64,
        location: &GeoLocation,
        rising: bool,
    ) -> Result<Option<f64>, EphemerisError> {
        let mut start = julian_day - 1.1;
        let mut last = None;
        while let Some(t) = self.next_sun_event(start, location, rising)? {
            if t > julian_day {
                break;
            }
            last = Some(t);
            start = t + 0.01;
        }
        Ok(last)
    }

    /// Julian day of the planet's next station (speed changes sign) within
    /// `max_days`. The luminaries never station.
    fn next_station(
        &self,
        planet: Planet,
        julian_day: f64,
        max_days: f64,
    ) -> Result<Option<f64>, EphemerisError> {
        if matches!(planet, Planet::Sun | Planet::Moon) {
            return Ok(None);
        }

        let mut previous = self.body(planet, julian_day)?.speed;
        let mut current_jd = julian_day + STATION_SCAN_STEP;
        let end = julian_day + max_days;

        while current_jd < end {
            let speed = self.body(planet, current_jd)?.speed;
            if (previous >= 0.0) != (speed >= 0.0) {
                let (mut before, mut after) = (current_jd - STATION_SCAN_STEP, current_jd);
                let before_speed = previous;
                while after - before > STATION_TOLERANCE {
                    let mid = (before + after) / 2.0;
                    let mid_speed = self.body(planet, mid)?.speed;
                    if (before_speed >= 0.0) == (mid_speed >= 0.0) {
                        before = mid;
                    } else {
                        after = mid;
                    }
                }
                return Ok(Some((before + after) / 2.0));
            }
            previous = speed;
            current_jd += STATION_SCAN_STEP;
        }
        Ok(None)
    }
}

/// Altitude of an ecliptic point for an observer, via equatorial
/// coordinates and local sidereal time.
pub fn ecliptic_altitude(lon: f64, lat: f64, julian_day: f64, location: &GeoLocation) -> f64 {
    let t = (julian_day - time::J2000_JD) / 36_525.0;
    let eps = (23.439_291 - 0.013_004_2 * t).to_radians();
    let (lam, beta) = (lon.to_radians(), lat.to_radians());

    let sin_dec = beta.sin() * eps.cos() + beta.cos() * eps.sin() * lam.sin();
    let dec = sin_dec.asin();
    let ra = (lam.sin() * eps.cos() - beta.tan() * eps.sin()).atan2(lam.cos());

    let gmst = 280.460_618_37 + 360.985_647_366_29 * (julian_day - time::J2000_JD)
        + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;
    let lst = normalize_degrees(gmst + location.lon).to_radians();
    let hour_angle = lst - ra;

    let phi = location.lat.to_radians();
    let sin_alt = phi.sin() * dec.sin() + phi.cos() * dec.cos() * hour_angle.cos();
    sin_alt.clamp(-1.0, 1.0).asin().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A Sun that circles the ecliptic at a steady rate and a Mars that turns
    /// retrograde after ten days.
    struct Uniform;

    impl Ephemeris for Uniform {
        fn body(&self, planet: Planet, jd: f64) -> Result<BodyPosition, EphemerisError> {
            let d = jd - time::J2000_JD;
            Ok(match planet {
                Planet::Sun => BodyPosition::new(normalize_degrees(280.46 + 0.985_647 * d), 0.985_647),
                Planet::Mars => BodyPosition::new(100.0, 0.5 - 0.05 * (d - 8000.0)),
                _ => BodyPosition::new(0.0, 1.0),
            })
        }

        fn houses(&self, _jd: f64, _location: &GeoLocation) -> Result<HouseFrame, EphemerisError> {
            Ok(HouseFrame::equal(0.0))
        }
    }

    #[test]
    fn test_station_is_found_and_refined() {
        let station = Uniform.next_station(Planet::Mars, time::J2000_JD + 8000.0, 365.0).unwrap();
        let jd = station.unwrap();
        assert!((jd - (time::J2000_JD + 8010.0)).abs() < 0.002);
        assert_eq!(Uniform.next_station(Planet::Moon, time::J2000_JD, 365.0).unwrap(), None);
    }

    #[test]
    fn test_sunrise_precedes_sunset_at_mid_latitude() {
        let london = GeoLocation { lat: 51.5, lon: 0.0 };
        let start = time::J2000_JD - 0.5; // midnight UT
        let rise = Uniform.next_sun_event(start, &london, true).unwrap().unwrap();
        let set = Uniform.next_sun_event(start, &london, false).unwrap().unwrap();
        assert!(rise < set);
        let noon_alt = Uniform.sun_altitude(time::J2000_JD, &london).unwrap();
        assert!(noon_alt > 10.0 && noon_alt < 20.0, "winter noon altitude {noon_alt}");
        assert!(Uniform.sun_altitude(start, &london).unwrap() < -50.0);
    }
}

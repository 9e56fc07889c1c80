use serde::{Deserialize, Serialize};

/// Geographic location coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
}

/// One body as returned by the ephemeris
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPosition {
    /// Longitude in degrees (0-360)
    pub longitude: f64,
    /// Latitude in degrees
    pub latitude: f64,
    /// Speed in longitude (degrees per day)
    pub speed: f64,
}

impl BodyPosition {
    pub fn new(longitude: f64, speed: f64) -> Self {
        Self {
            longitude,
            latitude: 0.0,
            speed,
        }
    }
}

/// Regiomontanus house cusps and angles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HouseFrame {
    /// Cusps of houses 1-12 in degrees
    pub cusps: [f64; 12],
    pub ascendant: f64,
    pub midheaven: f64,
}

impl HouseFrame {
    /// Twelve 30 degree houses starting at `ascendant`; handy for manual charts.
    pub fn equal(ascendant: f64) -> Self {
        let mut cusps = [0.0; 12];
        for (i, cusp) in cusps.iter_mut().enumerate() {
            *cusp = (ascendant + i as f64 * 30.0).rem_euclid(360.0);
        }
        Self {
            cusps,
            ascendant,
            midheaven: cusps[9],
        }
    }
}

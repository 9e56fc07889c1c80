use crate::ephemeris::types::{BodyPosition, GeoLocation, HouseFrame};
use crate::ephemeris::{Ephemeris, EphemerisError};
use crate::western::types::{normalize_degrees, Planet};
use std::env;
use std::path::PathBuf;
use swisseph::swe::{calc_ut, houses_ex, set_ephe_path};

/// FLG_SWIEPH (2) | FLG_SPEED (256)
const CALC_FLAGS: i32 = 2 | 256;

/// Regiomontanus, the customary horary house system.
const HOUSE_SYSTEM: u8 = b'R';

const DEFAULT_EPHEMERIS_PATH: &str = "/usr/local/share/swisseph";

fn planet_code(planet: Planet) -> i32 {
    match planet {
        Planet::Sun => 0,
        Planet::Moon => 1,
        Planet::Mercury => 2,
        Planet::Venus => 3,
        Planet::Mars => 4,
        Planet::Jupiter => 5,
        Planet::Saturn => 6,
    }
}

/// Swiss Ephemeris adapter implementation
pub struct SwissEphemerisAdapter {
    ephemeris_path: PathBuf,
}

impl SwissEphemerisAdapter {
    /// Create a new adapter and point Swiss Ephemeris at its data files.
    /// An explicit path must exist. A path from `SWISS_EPHEMERIS_PATH` or
    /// the default location may be missing, in which case the library
    /// computes with its built-in analytical ephemeris.
    pub fn new(ephemeris_path: Option<PathBuf>) -> Result<Self, EphemerisError> {
        let path = match ephemeris_path {
            Some(path) if !path.exists() => {
                return Err(EphemerisError::FileNotFound {
                    path: path.display().to_string(),
                    message: "Ephemeris path does not exist. Please ensure Swiss Ephemeris data files are installed.".to_string(),
                });
            }
            Some(path) => path,
            None => env::var("SWISS_EPHEMERIS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_EPHEMERIS_PATH)),
        };

        if path.exists() {
            log::info!("using Swiss Ephemeris files from {}", path.display());
            set_ephe_path(&path.to_string_lossy());
        } else {
            log::warn!(
                "ephemeris files not found at {}, falling back to analytical ephemeris",
                path.display()
            );
        }
        Ok(Self { ephemeris_path: path })
    }

    pub fn ephemeris_path(&self) -> &PathBuf {
        &self.ephemeris_path
    }
}

impl Ephemeris for SwissEphemerisAdapter {
    fn body(&self, planet: Planet, julian_day: f64) -> Result<BodyPosition, EphemerisError> {
        let result = calc_ut(julian_day, planet_code(planet) as u32, CALC_FLAGS as u32).map_err(|e| {
            EphemerisError::CalculationFailed {
                planet: planet.name().to_string(),
                julian_day,
                message: format!("Swiss Ephemeris error: {}", e),
            }
        })?;

        let out = result.out;
        Ok(BodyPosition {
            longitude: normalize_degrees(out[0]),
            latitude: out[1],
            speed: out[3],
        })
    }

    fn houses(&self, julian_day: f64, location: &GeoLocation) -> Result<HouseFrame, EphemerisError> {
        use swisseph::{AscMc, Cusp};

        let (c, a) = houses_ex(julian_day, 0, location.lat, location.lon, HOUSE_SYSTEM as i32);
        let cusps = Cusp::from_array(c);
        let ascmc = AscMc::from_array(a);

        let values = [
            cusps.first, cusps.second, cusps.third, cusps.fourth,
            cusps.fifth, cusps.sixth, cusps.seventh, cusps.eighth,
            cusps.ninth, cusps.tenth, cusps.eleventh, cusps.twelfth,
        ];
        if values.iter().any(|v| !v.is_finite()) || !ascmc.ascendant.is_finite() {
            return Err(EphemerisError::HouseCalculationFailed {
                message: format!(
                    "no Regiomontanus cusps for latitude {:.4}",
                    location.lat
                ),
            });
        }

        let mut out = [0.0; 12];
        for (slot, value) in out.iter_mut().zip(values.iter()) {
            *slot = normalize_degrees(*value);
        }

        Ok(HouseFrame {
            cusps: out,
            ascendant: normalize_degrees(ascmc.ascendant),
            midheaven: normalize_degrees(ascmc.mc),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_explicit_path_is_rejected() {
        let missing = env::temp_dir().join("horary-no-such-ephemeris-dir");
        match SwissEphemerisAdapter::new(Some(missing.clone())) {
            Err(EphemerisError::FileNotFound { path, .. }) => assert_eq!(path, missing.display().to_string()),
            other => panic!("expected FileNotFound, got {:?}", other.map(|a| a.ephemeris_path().clone())),
        }
    }

    #[test]
    fn test_explicit_path_is_kept() {
        let dir = env::temp_dir();
        let adapter = SwissEphemerisAdapter::new(Some(dir.clone())).unwrap();
        assert_eq!(adapter.ephemeris_path(), &dir);
    }
}

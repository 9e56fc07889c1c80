//! Solar condition of each planet: cazimi, combustion, under the beams or free.

use crate::western::types::{angular_distance, normalize_degrees, Planet, Sign};
use horary_config::OrbSettings;
use serde::{Deserialize, Serialize};

/// Within 3 arc-minutes of the Sun.
const EXACT_CAZIMI_DEG: f64 = 3.0 / 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolarCondition {
    Cazimi,
    Combustion,
    UnderBeams,
    Free,
}

impl SolarCondition {
    pub fn name(&self) -> &'static str {
        match self {
            SolarCondition::Cazimi => "Cazimi",
            SolarCondition::Combustion => "Combustion",
            SolarCondition::UnderBeams => "Under the Beams",
            SolarCondition::Free => "Free of Sun",
        }
    }

    /// Nominal modifier reported alongside the condition.
    pub fn dignity_modifier(&self) -> i32 {
        match self {
            SolarCondition::Cazimi => 5,
            SolarCondition::Combustion => -5,
            SolarCondition::UnderBeams => -3,
            SolarCondition::Free => 0,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SolarCondition::Cazimi => "In the heart of the Sun, greatly strengthened",
            SolarCondition::Combustion => "Burned by the Sun, severely weakened",
            SolarCondition::UnderBeams => "Under the Sun's beams, weakened",
            SolarCondition::Free => "Free from solar interference",
        }
    }

    pub fn is_afflicted(&self) -> bool {
        matches!(self, SolarCondition::Combustion | SolarCondition::UnderBeams)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarAnalysis {
    pub planet: Planet,
    /// Elongation from the Sun, 0-180.
    pub distance_from_sun: f64,
    pub condition: SolarCondition,
    pub exact_cazimi: bool,
    /// Set when a visibility exception reduced combustion or beams to free.
    pub traditional_exception: bool,
}

impl SolarAnalysis {
    pub fn free(planet: Planet, distance_from_sun: f64) -> Self {
        Self {
            planet,
            distance_from_sun,
            condition: SolarCondition::Free,
            exact_cazimi: false,
            traditional_exception: false,
        }
    }
}

/// True when the planet rises before the Sun (0-180 degrees ahead of it).
pub fn is_oriental(planet_longitude: f64, sun_longitude: f64) -> bool {
    let rel = normalize_degrees(planet_longitude - sun_longitude);
    rel > 0.0 && rel < 180.0
}

pub struct SolarAnalyzer<'a> {
    orbs: &'a OrbSettings,
}

impl<'a> SolarAnalyzer<'a> {
    pub fn new(orbs: &'a OrbSettings) -> Self {
        Self { orbs }
    }

    /// Classify one planet against the Sun. `sun_altitude` is the Sun's
    /// altitude for the observer at the chart moment, in degrees.
    pub fn classify(
        &self,
        planet: Planet,
        longitude: f64,
        sign: Sign,
        sun_longitude: f64,
        sun_altitude: f64,
    ) -> SolarAnalysis {
        if planet == Planet::Sun {
            return SolarAnalysis::free(planet, 0.0);
        }

        let elongation = angular_distance(longitude, sun_longitude);

        if elongation <= self.orbs.cazimi_orb_deg() {
            return SolarAnalysis {
                planet,
                distance_from_sun: elongation,
                condition: SolarCondition::Cazimi,
                exact_cazimi: elongation <= EXACT_CAZIMI_DEG,
                traditional_exception: false,
            };
        }

        let afflicted = if elongation <= self.orbs.combustion_orb {
            Some(SolarCondition::Combustion)
        } else if elongation <= self.orbs.under_beams_orb {
            Some(SolarCondition::UnderBeams)
        } else {
            None
        };

        match afflicted {
            Some(condition) => {
                let excepted = visibility_exception(planet, elongation, sign, sun_altitude);
                SolarAnalysis {
                    planet,
                    distance_from_sun: elongation,
                    condition: if excepted { SolarCondition::Free } else { condition },
                    exact_cazimi: false,
                    traditional_exception: excepted,
                }
            }
            None => SolarAnalysis::free(planet, elongation),
        }
    }
}

/// Mercury and Venus can escape combustion when visible in twilight.
/// The wide-elongation escapes (18 and 40 degrees) only come into play
/// when `under_beams_orb` is configured beyond them.
fn visibility_exception(planet: Planet, elongation: f64, sign: Sign, sun_altitude: f64) -> bool {
    if elongation < 10.0 {
        return false;
    }
    let twilight = sun_altitude <= -8.0;
    match planet {
        Planet::Mercury => {
            twilight
                && (matches!(sign, Sign::Gemini | Sign::Virgo) || elongation >= 18.0)
        }
        Planet::Venus => twilight || elongation >= 40.0,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horary_config::HorarySettings;

    fn classify(planet: Planet, lon: f64, sun: f64, altitude: f64) -> SolarAnalysis {
        let settings = HorarySettings::bundled().unwrap();
        SolarAnalyzer::new(&settings.orbs).classify(
            planet,
            lon,
            Sign::from_longitude(lon),
            sun,
            altitude,
        )
    }

    #[test]
    fn test_cazimi_and_exact_cazimi() {
        let a = classify(Planet::Mars, 100.2, 100.0, 10.0);
        assert_eq!(a.condition, SolarCondition::Cazimi);
        assert!(!a.exact_cazimi);
        let b = classify(Planet::Mars, 100.01, 100.0, 10.0);
        assert!(b.exact_cazimi);
    }

    #[test]
    fn test_combustion_and_beams() {
        assert_eq!(classify(Planet::Saturn, 105.0, 100.0, 10.0).condition, SolarCondition::Combustion);
        assert_eq!(classify(Planet::Saturn, 112.0, 100.0, 10.0).condition, SolarCondition::UnderBeams);
        assert_eq!(classify(Planet::Saturn, 130.0, 100.0, 10.0).condition, SolarCondition::Free);
    }

    #[test]
    fn test_mercury_exception_needs_twilight() {
        // Gemini, 12 degrees from the Sun
        let lit = classify(Planet::Mercury, 72.0, 60.0, 5.0);
        assert_eq!(lit.condition, SolarCondition::UnderBeams);
        let dark = classify(Planet::Mercury, 72.0, 60.0, -12.0);
        assert_eq!(dark.condition, SolarCondition::Free);
        assert!(dark.traditional_exception);
    }

    #[test]
    fn test_venus_exception_in_twilight() {
        let v = classify(Planet::Venus, 112.0, 100.0, -9.0);
        assert_eq!(v.condition, SolarCondition::Free);
        assert!(v.traditional_exception);
    }

    #[test]
    fn test_wide_elongation_escape_needs_wider_beams() {
        let mut settings = HorarySettings::bundled().unwrap();
        let classify_with = |settings: &HorarySettings, planet, lon: f64, altitude| {
            SolarAnalyzer::new(&settings.orbs).classify(planet, lon, Sign::from_longitude(lon), 100.0, altitude)
        };

        // Default beams stop at 15 degrees, so Venus at 14 in daylight stays afflicted.
        assert_eq!(classify_with(&settings, Planet::Venus, 114.0, 20.0).condition, SolarCondition::UnderBeams);

        settings.orbs.under_beams_orb = 45.0;
        let venus = classify_with(&settings, Planet::Venus, 142.0, 20.0);
        assert_eq!(venus.condition, SolarCondition::Free);
        assert!(venus.traditional_exception);
        assert_eq!(classify_with(&settings, Planet::Venus, 130.0, 20.0).condition, SolarCondition::UnderBeams);

        // Mercury at 20 degrees in Leo escapes only in twilight.
        assert_eq!(classify_with(&settings, Planet::Mercury, 120.0, 20.0).condition, SolarCondition::UnderBeams);
        assert!(classify_with(&settings, Planet::Mercury, 120.0, -10.0).traditional_exception);
    }

    #[test]
    fn test_orientality() {
        assert!(is_oriental(110.0, 100.0));
        assert!(!is_oriental(90.0, 100.0));
    }
}

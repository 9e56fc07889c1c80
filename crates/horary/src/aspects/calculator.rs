use crate::aspects::timing::{days_to_sign_exit, format_timing_description};
use crate::aspects::types::{Aspect, AspectInfo, LunarAspect};
use crate::chart::types::{PlanetPosition, StationTable};
use crate::ephemeris::julian_day_to_datetime;
use crate::western::types::{angular_distance, normalize_degrees, Planet};
use horary_config::HorarySettings;

/// Moiety used for a planet missing from the moiety table.
const DEFAULT_MOIETY: f64 = 8.0;

/// Look-ahead for the Moon's applying/separating test, in days.
const MOON_STEP_DAYS: f64 = 0.1;

/// Closest orbs are reported as at least this far from exact.
const MIN_DEGREES_TO_EXACT: f64 = 0.1;

/// Whether the gap to exact is shrinking or growing at this instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Applying,
    Separating,
    Exact,
}

/// Wrap a signed separation into (-180, 180].
fn wrap_signed(mut sep: f64) -> f64 {
    while sep > 180.0 {
        sep -= 360.0;
    }
    while sep <= -180.0 {
        sep += 360.0;
    }
    sep
}

pub struct AspectCalculator<'a> {
    settings: &'a HorarySettings,
}

impl<'a> AspectCalculator<'a> {
    pub fn new(settings: &'a HorarySettings) -> Self {
        Self { settings }
    }

    /// Largest orb at which `aspect` between the two planets still counts.
    /// Sum of moieties scaled per aspect; falls back to the flat orb plus
    /// luminary bonuses when no moieties are configured.
    pub fn max_orb(&self, p1: Planet, p2: Planet, aspect: Aspect) -> f64 {
        let orbs = &self.settings.orbs;
        if orbs.moieties.is_empty() {
            let mut orb = aspect.base_orb(orbs);
            if p1 == Planet::Sun || p2 == Planet::Sun {
                orb += orbs.sun_orb_bonus;
            }
            if p1 == Planet::Moon || p2 == Planet::Moon {
                orb += orbs.moon_orb_bonus;
            }
            return orb;
        }

        let m1 = self.settings.moiety(p1.id()).unwrap_or(DEFAULT_MOIETY);
        let m2 = self.settings.moiety(p2.id()).unwrap_or(DEFAULT_MOIETY);
        let combined = m1 + m2;
        match aspect {
            Aspect::Conjunction | Aspect::Opposition => combined,
            Aspect::Trine | Aspect::Square => combined * 0.85,
            Aspect::Sextile => combined * 0.7,
        }
    }

    /// Every pair of planets, first matching aspect per pair.
    pub fn compute_aspects(
        &self,
        planets: &[PlanetPosition; 7],
        julian_day: f64,
        stations: &StationTable,
    ) -> Vec<AspectInfo> {
        let mut aspects = Vec::new();

        for i in 0..planets.len() {
            for j in (i + 1)..planets.len() {
                let (pos1, pos2) = (&planets[i], &planets[j]);
                let separation = angular_distance(pos1.longitude, pos2.longitude);

                for aspect in Aspect::ALL {
                    let orb = (separation - aspect.degrees()).abs();
                    if orb > self.max_orb(pos1.planet, pos2.planet, aspect) {
                        continue;
                    }

                    let applying = self.is_applying(pos1, pos2, aspect, stations);
                    let (degrees_to_exact, exact_jd) = self.degrees_to_exact(pos1, pos2, aspect, julian_day);
                    aspects.push(AspectInfo {
                        planet1: pos1.planet,
                        planet2: pos2.planet,
                        aspect,
                        orb,
                        applying,
                        exact_time: exact_jd.and_then(julian_day_to_datetime),
                        degrees_to_exact,
                    });
                    break;
                }
            }
        }

        aspects
    }

    /// Pure kinematics: is the orb closing over the next timing step?
    pub fn motion(&self, pos1: &PlanetPosition, pos2: &PlanetPosition, aspect: Aspect) -> Motion {
        let (faster, slower) = faster_slower(pos1, pos2);
        let separation = wrap_signed(faster.longitude - slower.longitude);
        let target = closest_target(separation, aspect);
        let current_orb = (separation - target).abs();

        let step = self.settings.timing.timing_precision_days;
        let future = wrap_signed(separation + (faster.speed - slower.speed) * step);
        let future_orb = (future - target).abs();

        if future_orb < current_orb {
            Motion::Applying
        } else if future_orb > current_orb {
            Motion::Separating
        } else {
            Motion::Exact
        }
    }

    /// Applying, and able to perfect before either body leaves its sign
    /// or stations.
    pub fn is_applying(
        &self,
        pos1: &PlanetPosition,
        pos2: &PlanetPosition,
        aspect: Aspect,
        stations: &StationTable,
    ) -> bool {
        if self.motion(pos1, pos2, aspect) != Motion::Applying {
            return false;
        }

        let (faster, slower) = faster_slower(pos1, pos2);
        let separation = wrap_signed(faster.longitude - slower.longitude);
        let current_orb = (separation - closest_target(separation, aspect)).abs();
        let relative = (faster.speed - slower.speed).abs();
        let days_to_perfect = if relative > 0.0 {
            current_orb / relative
        } else {
            f64::INFINITY
        };

        !self.frustrated_before(faster, slower, days_to_perfect, stations)
    }

    pub fn is_separating(&self, pos1: &PlanetPosition, pos2: &PlanetPosition, aspect: Aspect) -> bool {
        self.motion(pos1, pos2, aspect) == Motion::Separating
    }

    /// True when either body exits its sign or stations before `days`.
    pub fn frustrated_before(
        &self,
        a: &PlanetPosition,
        b: &PlanetPosition,
        days: f64,
        stations: &StationTable,
    ) -> bool {
        let threshold = self.settings.timing.stationary_speed_threshold;
        [a, b].iter().any(|p| {
            let exits_first = days_to_sign_exit(p.longitude, p.speed, threshold)
                .map_or(false, |exit| days > exit);
            exits_first || stations.stations_within(p.planet, days)
        })
    }

    /// Days the body has left in its sign, `None` when stationary.
    pub fn days_to_sign_exit(&self, pos: &PlanetPosition) -> Option<f64> {
        days_to_sign_exit(pos.longitude, pos.speed, self.settings.timing.stationary_speed_threshold)
    }

    /// Orb from exact and, when within the timing horizon, the Julian day of
    /// perfection.
    pub fn degrees_to_exact(
        &self,
        pos1: &PlanetPosition,
        pos2: &PlanetPosition,
        aspect: Aspect,
        julian_day: f64,
    ) -> (f64, Option<f64>) {
        let separation = angular_distance(pos1.longitude, pos2.longitude);
        let orb = (separation - aspect.degrees()).abs();

        let relative = (pos1.speed - pos2.speed).abs();
        let exact_jd = if relative > 0.0 {
            let days = orb / relative;
            (days < self.settings.timing.max_future_days).then(|| julian_day + days)
        } else {
            None
        };

        (orb.max(MIN_DEGREES_TO_EXACT), exact_jd)
    }

    /// Most recent aspect the Moon is separating from, within 1.5x the flat orb.
    pub fn moon_last_aspect(&self, planets: &[PlanetPosition; 7], moon_speed: f64) -> Option<LunarAspect> {
        let moon = &planets[Planet::Moon.index()];
        let mut best: Option<LunarAspect> = None;

        for other in planets.iter().filter(|p| p.planet != Planet::Moon) {
            let separation = angular_distance(moon.longitude, other.longitude);
            for aspect in Aspect::ALL {
                let orb = (separation - aspect.degrees()).abs();
                if orb > aspect.base_orb(&self.settings.orbs) * 1.5 {
                    continue;
                }
                if moon_orb_change(moon, other, aspect, moon_speed) <= 0.0 {
                    continue;
                }
                let days = if moon_speed > 0.0 { orb / moon_speed } else { f64::INFINITY };
                let candidate = LunarAspect {
                    planet: other.planet,
                    aspect,
                    orb,
                    degrees_difference: orb,
                    perfection_eta_days: days,
                    perfection_eta_description: format!("{:.1} days ago", days),
                    applying: false,
                };
                if best.as_ref().map_or(true, |b| days < b.perfection_eta_days) {
                    best = Some(candidate);
                }
            }
        }

        best
    }

    /// Soonest aspect the Moon is applying to, within the flat orb.
    pub fn moon_next_aspect(&self, planets: &[PlanetPosition; 7], moon_speed: f64) -> Option<LunarAspect> {
        let moon = &planets[Planet::Moon.index()];
        let mut best: Option<LunarAspect> = None;

        for other in planets.iter().filter(|p| p.planet != Planet::Moon) {
            let separation = angular_distance(moon.longitude, other.longitude);
            for aspect in Aspect::ALL {
                let orb = (separation - aspect.degrees()).abs();
                if orb > aspect.base_orb(&self.settings.orbs) {
                    continue;
                }
                if moon_orb_change(moon, other, aspect, moon_speed) >= 0.0 {
                    continue;
                }
                let relative = moon_speed - other.speed;
                let days = if relative != 0.0 {
                    orb / relative.abs()
                } else {
                    f64::INFINITY
                };
                let candidate = LunarAspect {
                    planet: other.planet,
                    aspect,
                    orb,
                    degrees_difference: orb,
                    perfection_eta_days: days,
                    perfection_eta_description: format_timing_description(days),
                    applying: true,
                };
                if best.as_ref().map_or(true, |b| days < b.perfection_eta_days) {
                    best = Some(candidate);
                }
            }
        }

        best
    }
}

fn faster_slower<'p>(a: &'p PlanetPosition, b: &'p PlanetPosition) -> (&'p PlanetPosition, &'p PlanetPosition) {
    if a.speed.abs() > b.speed.abs() {
        (a, b)
    } else {
        (b, a)
    }
}

/// Signed target separation nearest to `separation` for this aspect.
fn closest_target(separation: f64, aspect: Aspect) -> f64 {
    let t = aspect.degrees();
    let mut targets = vec![t, -t];
    if t != 0.0 && t != 180.0 {
        targets.extend([t - 360.0, 360.0 - t]);
    }
    targets
        .into_iter()
        .min_by(|a, b| (separation - a).abs().total_cmp(&(separation - b).abs()))
        .unwrap_or(t)
}

/// Change in the Moon's orb over a short step; negative means applying.
fn moon_orb_change(moon: &PlanetPosition, other: &PlanetPosition, aspect: Aspect, moon_speed: f64) -> f64 {
    let now = angular_distance(moon.longitude, other.longitude);
    let later = angular_distance(
        normalize_degrees(moon.longitude + moon_speed * MOON_STEP_DAYS),
        normalize_degrees(other.longitude + other.speed * MOON_STEP_DAYS),
    );
    (later - aspect.degrees()).abs() - (now - aspect.degrees()).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::western::types::Sign;

    fn pos(planet: Planet, longitude: f64, speed: f64) -> PlanetPosition {
        PlanetPosition {
            planet,
            longitude,
            latitude: 0.0,
            house: 1,
            sign: Sign::from_longitude(longitude),
            dignity_score: 0,
            retrograde: speed < 0.0,
            speed,
        }
    }

    #[test]
    fn test_moiety_orbs() {
        let settings = HorarySettings::bundled().unwrap();
        let calc = AspectCalculator::new(&settings);
        assert!((calc.max_orb(Planet::Mars, Planet::Jupiter, Aspect::Conjunction) - 16.5).abs() < 1e-9);
        assert!((calc.max_orb(Planet::Mars, Planet::Jupiter, Aspect::Trine) - 16.5 * 0.85).abs() < 1e-9);
        assert!((calc.max_orb(Planet::Mars, Planet::Jupiter, Aspect::Sextile) - 16.5 * 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_flat_orbs_without_moieties() {
        let mut settings = HorarySettings::bundled().unwrap();
        settings.orbs.moieties.clear();
        let calc = AspectCalculator::new(&settings);
        assert!((calc.max_orb(Planet::Sun, Planet::Moon, Aspect::Trine) - 11.0).abs() < 1e-9);
        assert!((calc.max_orb(Planet::Mars, Planet::Venus, Aspect::Sextile) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_applying_and_separating_are_exclusive() {
        let settings = HorarySettings::bundled().unwrap();
        let calc = AspectCalculator::new(&settings);
        let cases = [
            (10.0, 1.2, 102.0, 0.5, Aspect::Square),
            (10.0, 1.2, 4.0, 0.5, Aspect::Conjunction),
            (200.0, -0.4, 75.0, 0.1, Aspect::Trine),
            (350.0, 13.0, 52.0, 1.0, Aspect::Sextile),
        ];
        for (l1, s1, l2, s2, aspect) in cases {
            let a = pos(Planet::Mercury, l1, s1);
            let b = pos(Planet::Saturn, l2, s2);
            let m = calc.motion(&a, &b, aspect);
            assert_ne!(m, Motion::Exact);
            assert_eq!(m == Motion::Applying, !calc.is_separating(&a, &b, aspect));
        }
    }

    #[test]
    fn test_sign_exit_frustrates_application() {
        let settings = HorarySettings::bundled().unwrap();
        let calc = AspectCalculator::new(&settings);
        let stations = StationTable::new();
        // Mercury at 29 Aries closing on a square to Saturn at 4 Leo:
        // it leaves Aries after half a day but needs 2.5 days to perfect.
        let mercury = pos(Planet::Mercury, 29.0, 2.0);
        let saturn = pos(Planet::Saturn, 124.0, 0.0);
        assert_eq!(calc.motion(&mercury, &saturn, Aspect::Square), Motion::Applying);
        assert!(!calc.is_applying(&mercury, &saturn, Aspect::Square, &stations));

        let mercury = pos(Planet::Mercury, 20.0, 2.0);
        let saturn = pos(Planet::Saturn, 114.0, 0.0);
        assert!(calc.is_applying(&mercury, &saturn, Aspect::Square, &stations));
        // A station one day out blocks the same aspect.
        let stations = StationTable::new().with(Planet::Mercury, 1.0);
        assert!(!calc.is_applying(&mercury, &saturn, Aspect::Square, &stations));
    }

    #[test]
    fn test_orb_boundary_at_moiety_sum() {
        let settings = HorarySettings::bundled().unwrap();
        let calc = AspectCalculator::new(&settings);
        let mut planets = [
            pos(Planet::Sun, 200.0, 1.0),
            pos(Planet::Moon, 300.0, 13.0),
            pos(Planet::Mercury, 210.0, 1.0),
            pos(Planet::Venus, 215.0, 1.0),
            pos(Planet::Mars, 10.0, 0.5),
            pos(Planet::Jupiter, 26.5, 0.1),
            pos(Planet::Saturn, 160.0, 0.05),
        ];
        let aspects = calc.compute_aspects(&planets, 2_451_545.0, &StationTable::new());
        assert!(aspects.iter().any(|a| a.joins(Planet::Mars, Planet::Jupiter) && a.aspect == Aspect::Conjunction));

        planets[Planet::Jupiter.index()] = pos(Planet::Jupiter, 26.6, 0.1);
        let aspects = calc.compute_aspects(&planets, 2_451_545.0, &StationTable::new());
        assert!(!aspects.iter().any(|a| a.joins(Planet::Mars, Planet::Jupiter)));
    }

    #[test]
    fn test_moon_next_and_last() {
        let settings = HorarySettings::bundled().unwrap();
        let calc = AspectCalculator::new(&settings);
        let planets = [
            pos(Planet::Sun, 200.0, 1.0),
            pos(Planet::Moon, 100.0, 13.0),
            pos(Planet::Mercury, 225.0, 1.2),
            pos(Planet::Venus, 95.0, 1.1),
            pos(Planet::Mars, 310.0, 0.6),
            pos(Planet::Jupiter, 164.0, 0.1),
            pos(Planet::Saturn, 250.0, 0.05),
        ];
        let next = calc.moon_next_aspect(&planets, 13.0).unwrap();
        assert_eq!(next.planet, Planet::Jupiter);
        assert_eq!(next.aspect, Aspect::Sextile);
        assert!(next.applying);
        let last = calc.moon_last_aspect(&planets, 13.0).unwrap();
        assert_eq!(last.planet, Planet::Venus);
        assert!(last.perfection_eta_description.ends_with("days ago"));
    }
}

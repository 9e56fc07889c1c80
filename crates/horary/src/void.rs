//! Void-of-course Moon.
//!
//! Three rules are supported. `by_sign` projects every exact aspect
//! position inside the Moon's sign and asks whether the Moon reaches one
//! before the boundary. `by_orb` only asks whether the Moon is inside any
//! aspect orb right now. `lilly` is `by_sign` with Lilly's four excepted
//! signs. An exception never changes the `void` flag; it only marks the
//! condition as non-disqualifying.

use crate::aspects::Aspect;
use crate::chart::HoraryChart;
use crate::western::types::{angular_distance, degree_in_sign, normalize_degrees, Planet, Sign};
use horary_config::{HorarySettings, VoidRule};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoidOfCourse {
    pub void: bool,
    pub exception: bool,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degrees_left_in_sign: Option<f64>,
}

impl VoidOfCourse {
    /// Void and not rescued by an exception.
    pub fn is_effective(&self) -> bool {
        self.void && !self.exception
    }
}

/// One future aspect the Moon will reach inside its sign.
struct PendingAspect {
    planet: Planet,
    aspect: Aspect,
    target_degree: f64,
    degrees_to_reach: f64,
}

pub struct VoidChecker<'a> {
    settings: &'a HorarySettings,
}

impl<'a> VoidChecker<'a> {
    pub fn new(settings: &'a HorarySettings) -> Self {
        Self { settings }
    }

    /// Evaluate with the configured rule.
    pub fn check(&self, chart: &HoraryChart) -> VoidOfCourse {
        self.check_with(chart, self.settings.moon.void_rule)
    }

    pub fn check_with(&self, chart: &HoraryChart, rule: VoidRule) -> VoidOfCourse {
        match rule {
            VoidRule::BySign => self.by_sign(chart),
            VoidRule::ByOrb => self.by_orb(chart),
            VoidRule::Lilly => self.lilly(chart),
        }
    }

    pub fn by_sign(&self, chart: &HoraryChart) -> VoidOfCourse {
        let moon = chart.planet(Planet::Moon);
        let moon_degree = degree_in_sign(moon.longitude);
        let forward = moon.speed >= 0.0;
        let degrees_left = if forward { 30.0 - moon_degree } else { moon_degree };

        if moon.speed.abs() < self.settings.timing.stationary_speed_threshold {
            return VoidOfCourse {
                void: false,
                exception: false,
                reason: "Moon stationary - cannot be void of course".to_string(),
                degrees_left_in_sign: Some(degrees_left),
            };
        }

        let mut pending = Vec::new();
        for other in chart.planets.iter().filter(|p| p.planet != Planet::Moon) {
            for aspect in Aspect::ALL {
                for target in aspect_positions_in_sign(other.longitude, aspect, moon.sign) {
                    let target_degree = degree_in_sign(target);
                    let ahead = if forward {
                        target_degree - moon_degree
                    } else {
                        moon_degree - target_degree
                    };
                    if ahead > 0.0 && ahead < degrees_left {
                        pending.push(PendingAspect {
                            planet: other.planet,
                            aspect,
                            target_degree,
                            degrees_to_reach: ahead,
                        });
                    }
                }
            }
        }

        let is_void = pending.is_empty();
        let mut reason = match pending
            .iter()
            .min_by(|a, b| a.degrees_to_reach.total_cmp(&b.degrees_to_reach))
        {
            None => format!("Moon makes no more aspects before leaving {}", moon.sign),
            Some(next) => format!(
                "Moon will {} {} at {:.1}° {}",
                next.aspect.display_name().to_lowercase(),
                next.planet,
                next.target_degree,
                moon.sign
            ),
        };

        let exceptions = &self.settings.moon.void_exceptions;
        let exception = match moon.sign {
            Sign::Cancer if exceptions.cancer => {
                reason.push_str(" (but in own sign - Cancer)");
                true
            }
            Sign::Sagittarius if exceptions.sagittarius => {
                reason.push_str(" (but in joy - Sagittarius)");
                true
            }
            Sign::Taurus if exceptions.taurus => {
                reason.push_str(" (but in exaltation - Taurus)");
                true
            }
            _ => false,
        };

        VoidOfCourse {
            void: is_void,
            exception,
            reason,
            degrees_left_in_sign: Some(degrees_left),
        }
    }

    pub fn by_orb(&self, chart: &HoraryChart) -> VoidOfCourse {
        let moon = chart.planet(Planet::Moon);
        let void_orb = self.settings.orbs.void_orb_deg;

        for other in chart.planets.iter().filter(|p| p.planet != Planet::Moon) {
            let separation = angular_distance(moon.longitude, other.longitude);
            for aspect in Aspect::ALL {
                if (separation - aspect.degrees()).abs() <= void_orb {
                    return VoidOfCourse {
                        void: false,
                        exception: false,
                        reason: format!("Moon within {void_orb}° orb of {aspect} to {}", other.planet),
                        degrees_left_in_sign: None,
                    };
                }
            }
        }

        VoidOfCourse {
            void: true,
            exception: false,
            reason: format!("Moon not within {void_orb}° of any aspect"),
            degrees_left_in_sign: None,
        }
    }

    pub fn lilly(&self, chart: &HoraryChart) -> VoidOfCourse {
        let sign = chart.planet(Planet::Moon).sign;
        let mut result = self.by_sign(chart);
        result.exception = matches!(sign, Sign::Cancer | Sign::Taurus | Sign::Sagittarius | Sign::Pisces);
        if result.exception {
            result.reason.push_str(&format!(" (Lilly exception: {sign})"));
        }
        result
    }
}

/// Longitudes inside `sign` where the Moon would perfect `aspect` to a
/// body at `planet_longitude`.
fn aspect_positions_in_sign(planet_longitude: f64, aspect: Aspect, sign: Sign) -> Vec<f64> {
    let start = sign.start_degree();
    let mut out = Vec::with_capacity(2);
    for candidate in [
        normalize_degrees(planet_longitude + aspect.degrees()),
        normalize_degrees(planet_longitude - aspect.degrees()),
    ] {
        if candidate >= start && candidate < start + 30.0 && !out.contains(&candidate) {
            out.push(candidate);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::fixtures::{chart, settings, Layout};

    #[test]
    fn test_aspect_positions_in_sign() {
        // Mars at 10 Aries: its trine falls at 10 Leo and 10 Sagittarius.
        assert_eq!(aspect_positions_in_sign(10.0, Aspect::Trine, Sign::Leo), vec![130.0]);
        assert_eq!(aspect_positions_in_sign(10.0, Aspect::Trine, Sign::Sagittarius), vec![250.0]);
        assert!(aspect_positions_in_sign(10.0, Aspect::Trine, Sign::Virgo).is_empty());
        // Conjunction and opposition project to a single point.
        assert_eq!(aspect_positions_in_sign(10.0, Aspect::Conjunction, Sign::Aries), vec![10.0]);
        assert_eq!(aspect_positions_in_sign(10.0, Aspect::Opposition, Sign::Libra), vec![190.0]);
    }

    /// Moon at 28 Leo: every aspect point left in Leo lies behind it and
    /// no body is within eight degrees of an aspect.
    const LATE_LEO_MOON: Layout = [
        (178.0, 0.98),
        (148.0, 13.0),
        (193.0, 1.3),
        (223.0, 1.2),
        (253.0, 0.6),
        (298.0, 0.1),
        (73.0, 0.05),
    ];

    #[test]
    fn test_by_sign_void_when_nothing_lies_ahead() {
        let settings = settings();
        let void = VoidChecker::new(&settings).check_with(&chart(&settings, &LATE_LEO_MOON, 10.0), VoidRule::BySign);
        assert!(void.void);
        assert!(!void.exception);
        assert!(void.is_effective());
        assert_eq!(void.reason, "Moon makes no more aspects before leaving Leo");
        assert!((void.degrees_left_in_sign.unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_by_sign_names_the_next_perfection() {
        let settings = settings();
        let mut layout = LATE_LEO_MOON;
        // Moon at 5 Leo reaches the sextile point of Mercury at 13 Leo first.
        layout[Planet::Moon.index()].0 = 125.0;
        let void = VoidChecker::new(&settings).check_with(&chart(&settings, &layout, 10.0), VoidRule::BySign);
        assert!(!void.void);
        assert_eq!(void.reason, "Moon will sextile Mercury at 13.0° Leo");
        assert!((void.degrees_left_in_sign.unwrap() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_by_orb_looks_only_at_current_orbs() {
        let settings = settings();
        let checker = VoidChecker::new(&settings);

        let void = checker.check_with(&chart(&settings, &LATE_LEO_MOON, 10.0), VoidRule::ByOrb);
        assert!(void.void);
        assert_eq!(void.degrees_left_in_sign, None);
        assert!(void.reason.starts_with("Moon not within"));

        // Jupiter at 28 Sagittarius sits on the Moon's trine.
        let mut layout = LATE_LEO_MOON;
        layout[Planet::Jupiter.index()].0 = 268.0;
        let chart = chart(&settings, &layout, 10.0);
        let in_orb = checker.check_with(&chart, VoidRule::ByOrb);
        assert!(!in_orb.void);
        assert!(in_orb.reason.ends_with("of Trine to Jupiter"));
        // The trine is already exact, so by sign nothing is left ahead.
        assert!(checker.check_with(&chart, VoidRule::BySign).void);
    }
}

//! Is the chart fit to be judged?
//!
//! Gates run in order and the first failure wins: early or late
//! Ascendant, Saturn in the 7th, Moon in the Via Combusta, and agreement
//! between the planetary hour and the Ascendant.

use crate::chart::HoraryChart;
use crate::western::rulers::sign_ruler;
use crate::western::types::{degree_in_sign, Planet, Sign};
use horary_config::{HourAgreementMode, RadicalitySettings};
use serde::Serialize;

/// Which gate rejected the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RadicalityFailure {
    AscendantTooEarly,
    AscendantTooLate,
    SaturnInSeventh,
    ViaCombusta,
    HourDisagreement,
}

impl RadicalityFailure {
    /// Early and late Ascendants only warn; everything else caps confidence.
    pub fn is_ascendant_warning(&self) -> bool {
        matches!(self, RadicalityFailure::AscendantTooEarly | RadicalityFailure::AscendantTooLate)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadicalityCheck {
    pub valid: bool,
    pub reason: String,
    pub failure: Option<RadicalityFailure>,
}

impl RadicalityCheck {
    fn pass(reason: String) -> Self {
        Self {
            valid: true,
            reason,
            failure: None,
        }
    }

    fn fail(failure: RadicalityFailure, reason: String) -> Self {
        Self {
            valid: false,
            reason,
            failure: Some(failure),
        }
    }
}

pub struct RadicalityChecker<'a> {
    settings: &'a RadicalitySettings,
}

impl<'a> RadicalityChecker<'a> {
    pub fn new(settings: &'a RadicalitySettings) -> Self {
        Self { settings }
    }

    pub fn check(&self, chart: &HoraryChart, ignore_saturn_7th: bool) -> RadicalityCheck {
        let s = self.settings;
        let asc_degree = degree_in_sign(chart.ascendant);

        if asc_degree < s.asc_too_early {
            return RadicalityCheck::fail(
                RadicalityFailure::AscendantTooEarly,
                format!("Ascendant too early at {asc_degree:.1}° - question premature or not mature"),
            );
        }
        if asc_degree > s.asc_too_late {
            return RadicalityCheck::fail(
                RadicalityFailure::AscendantTooLate,
                format!("Ascendant too late at {asc_degree:.1}° - question too late or already decided"),
            );
        }

        if s.saturn_7th_enabled && !ignore_saturn_7th && chart.planet(Planet::Saturn).house == 7 {
            return RadicalityCheck::fail(
                RadicalityFailure::SaturnInSeventh,
                "Saturn in 7th house - astrologer may err in judgment (Bonatti)".to_string(),
            );
        }

        if s.via_combusta_enabled {
            let moon = chart.planet(Planet::Moon);
            let degree = degree_in_sign(moon.longitude);
            let burnt = (moon.sign == Sign::Libra && degree > s.via_combusta.libra_start)
                || (moon.sign == Sign::Scorpio && degree <= s.via_combusta.scorpio_end);
            if burnt {
                return RadicalityCheck::fail(
                    RadicalityFailure::ViaCombusta,
                    format!(
                        "Moon in Via Combusta ({} {degree:.1}°) - volatile or corrupted matter",
                        moon.sign
                    ),
                );
            }
        }

        if s.hour_agreement_enabled {
            let hour = self.hour_agreement(chart);
            if !hour.valid {
                return hour;
            }
        }

        RadicalityCheck::pass(format!("Chart is radical - Ascendant at {asc_degree:.1}°"))
    }

    /// Compare the planetary hour ruler with the Ascendant.
    pub fn hour_agreement(&self, chart: &HoraryChart) -> RadicalityCheck {
        let Some(hour) = chart.sky.planetary_hour else {
            return RadicalityCheck::pass("Planetary hour unavailable at this latitude".to_string());
        };
        let hour_ruler = hour.hour_ruler;
        let asc_sign = chart.ascendant_sign();
        let asc_ruler = sign_ruler(asc_sign);
        let ruler_sign = chart.planet(hour_ruler).sign;

        match self.settings.hour_agreement_mode {
            HourAgreementMode::Ruler if hour_ruler == asc_ruler => RadicalityCheck::pass(format!(
                "Planetary hour ruler {hour_ruler} matches Ascendant ruler"
            )),
            HourAgreementMode::Ruler => RadicalityCheck::fail(
                RadicalityFailure::HourDisagreement,
                format!("Planetary hour ruler {hour_ruler} does not match Ascendant ruler {asc_ruler}"),
            ),
            HourAgreementMode::Sign if ruler_sign == asc_sign => RadicalityCheck::pass(format!(
                "Planetary hour ruler {hour_ruler} in Ascendant sign {asc_sign}"
            )),
            HourAgreementMode::Sign => RadicalityCheck::fail(
                RadicalityFailure::HourDisagreement,
                format!("Planetary hour ruler {hour_ruler} not in Ascendant sign {asc_sign}"),
            ),
            HourAgreementMode::Triplicity if ruler_sign.element() == asc_sign.element() => {
                RadicalityCheck::pass("Planetary hour ruler shares triplicity with Ascendant".to_string())
            }
            HourAgreementMode::Triplicity => RadicalityCheck::fail(
                RadicalityFailure::HourDisagreement,
                "Planetary hour ruler does not share triplicity with Ascendant".to_string(),
            ),
            HourAgreementMode::Unsupported => {
                RadicalityCheck::pass("Unsupported hour agreement mode".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::fixtures::{chart, chart_with_hour, settings, Layout};
    use crate::chart::PlanetaryHour;

    /// Moon in Cancer, Saturn in the 9th from an Aries Ascendant.
    const QUIET: Layout = [
        (40.0, 0.98),
        (100.0, 13.0),
        (60.0, 1.2),
        (15.0, 1.1),
        (300.0, 0.6),
        (160.0, 0.1),
        (250.0, 0.05),
    ];

    fn with(planet: Planet, longitude: f64) -> Layout {
        let mut layout = QUIET;
        layout[planet.index()].0 = longitude;
        layout
    }

    fn hour(ruler: Planet) -> Option<PlanetaryHour> {
        Some(PlanetaryHour {
            day_ruler: Planet::Venus,
            hour_ruler: ruler,
            hour_index: 3,
        })
    }

    #[test]
    fn test_radical_chart_passes() {
        let settings = settings();
        let check = RadicalityChecker::new(&settings.radicality).check(&chart(&settings, &QUIET, 10.0), false);
        assert!(check.valid);
        assert_eq!(check.failure, None);
        assert_eq!(check.reason, "Chart is radical - Ascendant at 10.0°");
    }

    #[test]
    fn test_ascendant_bounds() {
        let settings = settings();
        let checker = RadicalityChecker::new(&settings.radicality);

        let early = checker.check(&chart(&settings, &QUIET, 2.0), false);
        assert_eq!(early.failure, Some(RadicalityFailure::AscendantTooEarly));

        let late = checker.check(&chart(&settings, &QUIET, 28.5), false);
        assert!(!late.valid);
        assert_eq!(late.failure, Some(RadicalityFailure::AscendantTooLate));
        assert!(late.reason.starts_with("Ascendant too late at 28.5°"));
        assert!(late.failure.unwrap().is_ascendant_warning());

        // Both limits are inclusive.
        assert!(checker.check(&chart(&settings, &QUIET, 3.0), false).valid);
        assert!(checker.check(&chart(&settings, &QUIET, 27.0), false).valid);
    }

    #[test]
    fn test_saturn_in_seventh() {
        let mut settings = settings();
        let saturn_7th = chart(&settings, &with(Planet::Saturn, 200.0), 10.0);
        assert_eq!(saturn_7th.planet(Planet::Saturn).house, 7);

        let check = RadicalityChecker::new(&settings.radicality).check(&saturn_7th, false);
        assert_eq!(check.failure, Some(RadicalityFailure::SaturnInSeventh));
        assert!(!check.failure.unwrap().is_ascendant_warning());

        assert!(RadicalityChecker::new(&settings.radicality).check(&saturn_7th, true).valid);

        settings.radicality.saturn_7th_enabled = false;
        assert!(RadicalityChecker::new(&settings.radicality).check(&saturn_7th, false).valid);
    }

    #[test]
    fn test_via_combusta_bounds() {
        let settings = settings();
        let checker = RadicalityChecker::new(&settings.radicality);
        let moon_at = |longitude: f64| checker.check(&chart(&settings, &with(Planet::Moon, longitude), 10.0), false);

        let libra = moon_at(200.0);
        assert_eq!(libra.failure, Some(RadicalityFailure::ViaCombusta));
        assert!(libra.reason.starts_with("Moon in Via Combusta (Libra 20.0°)"));
        assert!(moon_at(195.0).valid);
        assert_eq!(moon_at(225.0).failure, Some(RadicalityFailure::ViaCombusta));
        assert!(moon_at(226.0).valid);

        let mut relaxed = settings.radicality;
        relaxed.via_combusta_enabled = false;
        assert!(RadicalityChecker::new(&relaxed)
            .check(&chart(&settings, &with(Planet::Moon, 200.0), 10.0), false)
            .valid);
    }

    #[test]
    fn test_hour_agreement_by_ruler() {
        let mut settings = settings();
        settings.radicality.hour_agreement_enabled = true;
        settings.radicality.hour_agreement_mode = HourAgreementMode::Ruler;
        let checker = RadicalityChecker::new(&settings.radicality);

        let mars_hour = checker.check(&chart_with_hour(&settings, &QUIET, 10.0, hour(Planet::Mars)), false);
        assert!(mars_hour.valid);
        assert_eq!(mars_hour.reason, "Chart is radical - Ascendant at 10.0°");

        let venus_hour = checker.check(&chart_with_hour(&settings, &QUIET, 10.0, hour(Planet::Venus)), false);
        assert_eq!(venus_hour.failure, Some(RadicalityFailure::HourDisagreement));
        assert_eq!(
            venus_hour.reason,
            "Planetary hour ruler Venus does not match Ascendant ruler Mars"
        );
    }

    #[test]
    fn test_hour_agreement_by_sign_and_triplicity() {
        let mut settings = settings();
        settings.radicality.hour_agreement_mode = HourAgreementMode::Sign;
        let by_sign = RadicalityChecker::new(&settings.radicality);
        let venus_at = |longitude: f64| chart_with_hour(&settings, &with(Planet::Venus, longitude), 10.0, hour(Planet::Venus));

        assert!(by_sign.hour_agreement(&venus_at(15.0)).valid);
        let taurus = by_sign.hour_agreement(&venus_at(50.0));
        assert_eq!(taurus.failure, Some(RadicalityFailure::HourDisagreement));
        assert_eq!(taurus.reason, "Planetary hour ruler Venus not in Ascendant sign Aries");

        let mut triplicity = settings.radicality;
        triplicity.hour_agreement_mode = HourAgreementMode::Triplicity;
        let by_triplicity = RadicalityChecker::new(&triplicity);
        assert!(by_triplicity.hour_agreement(&venus_at(130.0)).valid);
        assert_eq!(
            by_triplicity.hour_agreement(&venus_at(50.0)).failure,
            Some(RadicalityFailure::HourDisagreement)
        );
    }

    #[test]
    fn test_hour_agreement_passes_when_undecidable() {
        let mut settings = settings();
        settings.radicality.hour_agreement_enabled = true;
        settings.radicality.hour_agreement_mode = HourAgreementMode::Unsupported;
        let checker = RadicalityChecker::new(&settings.radicality);

        let unsupported = checker.hour_agreement(&chart_with_hour(&settings, &QUIET, 10.0, hour(Planet::Venus)));
        assert!(unsupported.valid);
        assert_eq!(unsupported.reason, "Unsupported hour agreement mode");

        let polar = checker.hour_agreement(&chart(&settings, &QUIET, 10.0));
        assert!(polar.valid);
        assert_eq!(polar.reason, "Planetary hour unavailable at this latitude");
        assert!(checker.check(&chart(&settings, &QUIET, 10.0), false).valid);
    }
}

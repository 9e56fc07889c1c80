//! Collection of light: both significators apply to a slower planet that
//! they each receive in their dignities.

use crate::aspects::AspectCalculator;
use crate::chart::{HoraryChart, PlanetPosition};
use crate::solar::SolarCondition;
use crate::western::reception::ReceptionCalculator;
use crate::western::types::Planet;
use horary_config::HorarySettings;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Collection {
    pub collector: Planet,
    pub favorable: bool,
    /// The collector's own strength, 30-90.
    pub confidence: i32,
    pub collector_dignity: i32,
}

pub struct CollectionFinder<'a> {
    settings: &'a HorarySettings,
}

impl<'a> CollectionFinder<'a> {
    pub fn new(settings: &'a HorarySettings) -> Self {
        Self { settings }
    }

    pub fn find(&self, chart: &HoraryChart, querent: Planet, quesited: Planet) -> Option<Collection> {
        let q = chart.planet(querent);
        let qd = chart.planet(quesited);
        let receptions = ReceptionCalculator::new(&self.settings.reception);

        for collector in chart.planets.iter() {
            if collector.planet == querent || collector.planet == quesited {
                continue;
            }
            let speed = collector.speed.abs();
            if !(speed < q.speed.abs() && speed < qd.speed.abs()) {
                continue;
            }

            let (Some(from_querent), Some(from_quesited)) = (
                chart.applying_aspect(querent, collector.planet),
                chart.applying_aspect(quesited, collector.planet),
            ) else {
                continue;
            };

            if !(receptions.receives(chart, querent, collector.planet)
                && receptions.receives(chart, quesited, collector.planet))
            {
                continue;
            }

            if !self.completes_in_sign(q, collector, from_querent.degrees_to_exact)
                || !self.completes_in_sign(qd, collector, from_quesited.degrees_to_exact)
            {
                continue;
            }

            let mut confidence = 60;
            confidence += match collector.dignity_score {
                d if d >= 3 => 15,
                d if d >= 0 => 5,
                _ => -10,
            };
            if chart.solar(collector.planet).condition == SolarCondition::Combustion {
                confidence -= 20;
            }
            let favorable = !(from_querent.aspect.is_hard() || from_quesited.aspect.is_hard());
            if !favorable {
                confidence -= 10;
            }

            return Some(Collection {
                collector: collector.planet,
                favorable,
                confidence: confidence.clamp(30, 90),
                collector_dignity: collector.dignity_score,
            });
        }

        None
    }

    /// The significator reaches the collector before leaving its sign.
    fn completes_in_sign(&self, significator: &PlanetPosition, collector: &PlanetPosition, degrees_to_exact: f64) -> bool {
        let relative = (significator.speed - collector.speed).abs();
        let days = if relative > 0.0 {
            degrees_to_exact / relative
        } else {
            f64::INFINITY
        };
        AspectCalculator::new(self.settings)
            .days_to_sign_exit(significator)
            .map_or(true, |exit| days <= exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::fixtures::{chart, settings_without_minor_dignities, Layout};
    use crate::perfection::{PerfectionEngine, PerfectionOutcome};

    /// Day chart, Aries rising. Mercury in Taurus and Venus in Cancer both
    /// apply to Saturn in Virgo: Mercury rules Virgo, Venus holds its
    /// earth triplicity by day.
    const SATURN_COLLECTS: Layout = [
        (300.0, 0.98),
        (250.0, 13.0),
        (45.0, 1.3),
        (100.0, 1.2),
        (200.0, 0.6),
        (280.0, 0.1),
        (170.0, 0.05),
    ];

    /// Saturn burnt by the Sun in late Virgo, collecting Mercury's square
    /// and Venus's sextile.
    const BURNT_COLLECTOR: Layout = [
        (182.0, 0.98),
        (250.0, 13.0),
        (80.0, 1.3),
        (110.0, 1.2),
        (200.0, 0.6),
        (280.0, 0.1),
        (175.0, 0.05),
    ];

    #[test]
    fn test_slower_planet_collects_both() {
        let settings = settings_without_minor_dignities();
        let chart = chart(&settings, &SATURN_COLLECTS, 10.0);
        assert!(chart.is_day());

        let found = CollectionFinder::new(&settings)
            .find(&chart, Planet::Mercury, Planet::Venus)
            .unwrap();
        assert_eq!(found.collector, Planet::Saturn);
        assert!(found.favorable);
        assert!(found.collector_dignity < 0);
        assert_eq!(found.confidence, 50);
    }

    #[test]
    fn test_confidence_floor_for_burnt_collector_by_square() {
        let settings = settings_without_minor_dignities();
        let chart = chart(&settings, &BURNT_COLLECTOR, 300.0);
        assert_eq!(chart.solar(Planet::Saturn).condition, SolarCondition::Combustion);

        let found = CollectionFinder::new(&settings)
            .find(&chart, Planet::Mercury, Planet::Venus)
            .unwrap();
        assert_eq!(found.collector, Planet::Saturn);
        assert!(!found.favorable);
        assert_eq!(found.confidence, 30);
    }

    #[test]
    fn test_collector_must_be_slower() {
        let settings = settings_without_minor_dignities();
        let mut chart = chart(&settings, &SATURN_COLLECTS, 10.0);
        chart.planets[Planet::Saturn.index()].speed = 1.25;
        assert!(CollectionFinder::new(&settings)
            .find(&chart, Planet::Mercury, Planet::Venus)
            .is_none());
    }

    #[test]
    fn test_both_significators_must_apply() {
        let settings = settings_without_minor_dignities();
        let mut layout = SATURN_COLLECTS;
        // Mercury at 25 Taurus is already past the trine.
        layout[Planet::Mercury.index()].0 = 55.0;
        let chart = chart(&settings, &layout, 10.0);
        assert!(chart.separating_aspect(Planet::Mercury, Planet::Saturn).is_some());
        assert!(CollectionFinder::new(&settings)
            .find(&chart, Planet::Mercury, Planet::Venus)
            .is_none());
    }

    #[test]
    fn test_both_significators_must_receive_the_collector() {
        let settings = settings_without_minor_dignities();
        // Leo rising puts the Sun under the earth; the earth triplicity
        // passes to the Moon and Venus no longer receives Saturn.
        let chart = chart(&settings, &SATURN_COLLECTS, 130.0);
        assert!(!chart.is_day());
        assert!(CollectionFinder::new(&settings)
            .find(&chart, Planet::Mercury, Planet::Venus)
            .is_none());
    }

    #[test]
    fn test_completes_in_sign() {
        let settings = settings_without_minor_dignities();
        let chart = chart(&settings, &SATURN_COLLECTS, 10.0);
        let finder = CollectionFinder::new(&settings);
        let saturn = chart.planet(Planet::Saturn);
        // Mercury at 25 Taurus has about 3.8 days left in the sign.
        let mut mercury = *chart.planet(Planet::Mercury);
        mercury.longitude = 55.0;

        assert!(finder.completes_in_sign(&mercury, saturn, 4.0));
        assert!(!finder.completes_in_sign(&mercury, saturn, 5.0));

        let mut stalled = *saturn;
        stalled.speed = mercury.speed;
        assert!(!finder.completes_in_sign(&mercury, &stalled, 1.0));
    }

    #[test]
    fn test_engine_falls_back_to_collection() {
        let settings = settings_without_minor_dignities();
        let chart = chart(&settings, &SATURN_COLLECTS, 10.0);
        assert!(chart.applying_aspect(Planet::Mercury, Planet::Venus).is_none());

        let outcome = PerfectionEngine::new(&settings, 0.0).evaluate(&chart, Planet::Mercury, Planet::Venus);
        match &outcome {
            PerfectionOutcome::Collection {
                collector,
                confidence,
                reason,
                ..
            } => {
                assert_eq!(*collector, Planet::Saturn);
                assert_eq!(*confidence, settings.confidence.perfection.collection_of_light);
                assert_eq!(reason, "Collection of light by Saturn");
            }
            other => panic!("expected collection, got {other:?}"),
        }
        assert_eq!(outcome.reception_label(), "both_receive_collector");
    }
}

use crate::aspects::{format_aspect, Aspect, AspectCalculator, AspectInfo};
use crate::chart::{HoraryChart, PlanetPosition};
use crate::perfection::PerfectionOutcome;
use crate::solar::SolarCondition;
use crate::western::houses::is_cadent;
use crate::western::reception::{ReceptionCalculator, ReceptionKind, ReceptionResult};
use crate::western::types::Planet;
use horary_config::HorarySettings;
use serde::Serialize;
use std::fmt;

/// Why an applying aspect never completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "planet", rename_all = "snake_case")]
pub enum Frustration {
    Station(Planet),
    SignExit(Planet),
    NoRelativeMotion,
}

impl fmt::Display for Frustration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frustration::Station(p) => write!(f, "{p} stations first"),
            Frustration::SignExit(p) => write!(f, "{p} leaves its sign first"),
            Frustration::NoRelativeMotion => f.write_str("no relative motion"),
        }
    }
}

pub struct DirectEvaluation<'a> {
    settings: &'a HorarySettings,
    exaltation_boost: f64,
}

impl<'a> DirectEvaluation<'a> {
    pub fn new(settings: &'a HorarySettings, exaltation_boost: f64) -> Self {
        Self {
            settings,
            exaltation_boost,
        }
    }

    /// Judge one applying aspect between the significators.
    pub fn evaluate(
        &self,
        chart: &HoraryChart,
        querent: Planet,
        quesited: Planet,
        aspect: &AspectInfo,
    ) -> PerfectionOutcome {
        let reception_calc = ReceptionCalculator::new(&self.settings.reception);

        if let Some(combust) = combust_partner(chart, querent, quesited, aspect) {
            return PerfectionOutcome::CombustionDenial {
                aspect: aspect.clone(),
                combust,
                reception: reception_calc.compute(chart, querent, quesited).kind,
                confidence: self.settings.confidence.denial.combustion,
                reason: format!("Combustion denial: {combust} conjunct Sun causes combustion, not perfection"),
            };
        }

        let q = chart.planet(querent);
        let qd = chart.planet(quesited);
        if let Some(cause) = self.frustration(chart, q, qd, aspect.degrees_to_exact) {
            log::debug!("{} frustrated: {cause}", aspect.display());
            return PerfectionOutcome::Frustrated {
                aspect: aspect.clone(),
                cause,
                reason: format!(
                    "{} {} {} cannot perfect: {cause}",
                    querent, aspect.aspect, quesited
                ),
            };
        }

        let reception = reception_calc.compute(chart, querent, quesited);
        let tiers = &self.settings.confidence.perfection;
        let shown = format_aspect(querent, aspect.aspect, quesited, true);

        match reception.kind {
            ReceptionKind::MutualRulership => PerfectionOutcome::Direct {
                aspect: aspect.clone(),
                favorable: true,
                penalized: false,
                confidence: tiers.direct_with_mutual_rulership,
                reason: format!("Direct perfection: {shown} with {}", reception.display_text),
                reception,
            },
            ReceptionKind::MutualExaltation => PerfectionOutcome::Direct {
                aspect: aspect.clone(),
                favorable: true,
                penalized: false,
                confidence: (tiers.direct_with_mutual_exaltation as f64 + self.exaltation_boost).min(100.0) as i32,
                reason: format!("Direct perfection: {shown} with {}", reception.display_text),
                reception,
            },
            _ => self.by_aspect_quality(q, qd, aspect, reception),
        }
    }

    fn by_aspect_quality(
        &self,
        querent: &PlanetPosition,
        quesited: &PlanetPosition,
        aspect: &AspectInfo,
        reception: ReceptionResult,
    ) -> PerfectionOutcome {
        let basic = self.settings.confidence.perfection.direct_basic;
        let name = aspect.aspect.display_name();
        let (favorable, penalties) = favorability(aspect.aspect, &reception, querent, quesited);

        if favorable {
            let (confidence, reason) = if penalties.is_empty() {
                (basic, format!("{name} between significators"))
            } else {
                (
                    (basic - 15).max(0),
                    format!("{name} between significators but weakened: {}", penalties.join(", ")),
                )
            };
            PerfectionOutcome::Direct {
                aspect: aspect.clone(),
                reception,
                favorable: true,
                penalized: false,
                confidence,
                reason,
            }
        } else {
            let reason = if !penalties.is_empty() {
                format!("{name} penalized: {}", penalties.join("; "))
            } else if reception.kind == ReceptionKind::None {
                format!("{name} lacks reception")
            } else {
                format!("{name} unfavorable")
            };
            PerfectionOutcome::Direct {
                aspect: aspect.clone(),
                reception,
                favorable: false,
                penalized: true,
                confidence: (basic - 25).max(0),
                reason,
            }
        }
    }

    /// Station or sign exit before the aspect completes.
    fn frustration(
        &self,
        chart: &HoraryChart,
        a: &PlanetPosition,
        b: &PlanetPosition,
        degrees_to_exact: f64,
    ) -> Option<Frustration> {
        let relative = (a.speed - b.speed).abs();
        if relative == 0.0 {
            return Some(Frustration::NoRelativeMotion);
        }
        let days = degrees_to_exact / relative;

        for pos in [a, b] {
            if chart.sky.stations.stations_within(pos.planet, days) {
                return Some(Frustration::Station(pos.planet));
            }
        }
        let calculator = AspectCalculator::new(self.settings);
        for pos in [a, b] {
            if calculator.days_to_sign_exit(pos).map_or(false, |exit| days > exit) {
                return Some(Frustration::SignExit(pos.planet));
            }
        }
        None
    }
}

/// For a conjunction involving the Sun, the other party when it is combust.
fn combust_partner(chart: &HoraryChart, querent: Planet, quesited: Planet, aspect: &AspectInfo) -> Option<Planet> {
    if aspect.aspect != Aspect::Conjunction {
        return None;
    }
    let other = if querent == Planet::Sun {
        quesited
    } else if quesited == Planet::Sun {
        querent
    } else {
        return None;
    };
    (chart.solar(other).condition == SolarCondition::Combustion).then_some(other)
}

/// Aspect favorability plus the weaknesses that lower confidence when
/// there is no reception at all. Strong reception redeems any aspect.
fn favorability(
    aspect: Aspect,
    reception: &ReceptionResult,
    querent: &PlanetPosition,
    quesited: &PlanetPosition,
) -> (bool, Vec<String>) {
    if reception.kind.overcomes_hard_aspect() {
        return (true, Vec::new());
    }

    let mut penalties = Vec::new();
    if reception.kind == ReceptionKind::None {
        for pos in [quesited, querent] {
            if is_cadent(pos.house) {
                penalties.push(format!("{} in cadent {}th house", pos.planet, pos.house));
            }
            if pos.dignity_score < -5 {
                penalties.push(format!("{} severely weak (dignity {})", pos.planet, pos.dignity_score));
            }
        }
    }

    (aspect.is_favorable(), penalties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::western::types::Sign;

    fn pos(planet: Planet, house: u8, dignity_score: i32) -> PlanetPosition {
        PlanetPosition {
            planet,
            longitude: 0.0,
            latitude: 0.0,
            house,
            sign: Sign::Aries,
            dignity_score,
            retrograde: false,
            speed: 1.0,
        }
    }

    fn reception(kind: ReceptionKind) -> ReceptionResult {
        ReceptionResult {
            kind,
            planet1: Planet::Mars,
            planet2: Planet::Venus,
            planet1_receives_planet2: Vec::new(),
            planet2_receives_planet1: Vec::new(),
            day_chart: true,
            display_text: String::new(),
            strength: 0,
        }
    }

    #[test]
    fn test_mutual_reception_redeems_square() {
        let (favorable, penalties) = favorability(
            Aspect::Square,
            &reception(ReceptionKind::MixedReception),
            &pos(Planet::Mars, 3, -8),
            &pos(Planet::Venus, 6, -8),
        );
        assert!(favorable);
        assert!(penalties.is_empty());
    }

    #[test]
    fn test_cadent_and_weak_penalties_without_reception() {
        let (favorable, penalties) = favorability(
            Aspect::Trine,
            &reception(ReceptionKind::None),
            &pos(Planet::Mars, 1, 0),
            &pos(Planet::Venus, 12, -7),
        );
        assert!(favorable);
        assert_eq!(
            penalties,
            vec![
                "Venus in cadent 12th house".to_string(),
                "Venus severely weak (dignity -7)".to_string()
            ]
        );
    }

    #[test]
    fn test_unilateral_reception_skips_penalties() {
        let (favorable, penalties) = favorability(
            Aspect::Opposition,
            &reception(ReceptionKind::Unilateral),
            &pos(Planet::Mars, 3, -9),
            &pos(Planet::Venus, 9, -9),
        );
        assert!(!favorable);
        assert!(penalties.is_empty());
    }
}

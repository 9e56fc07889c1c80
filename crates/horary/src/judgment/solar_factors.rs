//! Solar conditions as they bear on a judgment.

use crate::chart::HoraryChart;
use crate::solar::SolarCondition;
use crate::western::types::Planet;
use horary_config::HorarySettings;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarDetail {
    pub planet: Planet,
    pub distance_from_sun: f64,
    pub condition: &'static str,
    pub dignity_modifier: i32,
    pub description: &'static str,
    pub exact_cazimi: bool,
    pub traditional_exception: bool,
    pub effect_ignored: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarFactors {
    pub significant: bool,
    pub summary: String,
    pub cazimi_count: usize,
    pub combustion_count: usize,
    pub under_beams_count: usize,
    pub detailed_analyses: BTreeMap<String, SolarDetail>,
    pub combustion_ignored: bool,
}

impl SolarFactors {
    pub fn analyze(chart: &HoraryChart, ignore_combustion: bool) -> Self {
        let mut cazimi = Vec::new();
        let mut combust = Vec::new();
        let mut beams = Vec::new();
        let mut detailed_analyses = BTreeMap::new();

        for analysis in chart.solar_analyses.iter() {
            match analysis.condition {
                SolarCondition::Cazimi => cazimi.push(analysis.planet.name()),
                SolarCondition::Combustion if !ignore_combustion => combust.push(analysis.planet.name()),
                SolarCondition::UnderBeams if !ignore_combustion => beams.push(analysis.planet.name()),
                _ => {}
            }

            let effect_ignored = ignore_combustion && analysis.condition.is_afflicted();
            detailed_analyses.insert(
                analysis.planet.name().to_string(),
                SolarDetail {
                    planet: analysis.planet,
                    distance_from_sun: round_to(analysis.distance_from_sun, 4),
                    condition: analysis.condition.name(),
                    dignity_modifier: if effect_ignored { 0 } else { analysis.condition.dignity_modifier() },
                    description: analysis.condition.description(),
                    exact_cazimi: analysis.exact_cazimi,
                    traditional_exception: analysis.traditional_exception,
                    effect_ignored,
                },
            );
        }

        let mut parts = Vec::new();
        if !cazimi.is_empty() {
            parts.push(format!("Cazimi: {}", cazimi.join(", ")));
        }
        if !combust.is_empty() {
            parts.push(format!("Combusted: {}", combust.join(", ")));
        }
        if !beams.is_empty() {
            parts.push(format!("Under Beams: {}", beams.join(", ")));
        }
        let afflicted_ignored = ignore_combustion
            && chart.solar_analyses.iter().any(|a| a.condition.is_afflicted());
        if afflicted_ignored {
            parts.push("(Combustion effects ignored by override)".to_string());
        }

        SolarFactors {
            significant: !parts.is_empty(),
            summary: if parts.is_empty() {
                "No significant solar conditions".to_string()
            } else {
                parts.join("; ")
            },
            cazimi_count: cazimi.len(),
            combustion_count: combust.len(),
            under_beams_count: beams.len(),
            detailed_analyses,
            combustion_ignored: ignore_combustion,
        }
    }

    pub fn detail(&self, planet: Planet) -> Option<&SolarDetail> {
        self.detailed_analyses.get(planet.name())
    }
}

/// Effect of the Sun on the two significators.
#[derive(Debug, Clone, PartialEq)]
pub enum SolarImpact {
    Nothing,
    Cazimi { bonus: i32 },
    /// Two or more severe impediments with denial switched on.
    Denial { reason: String },
    Penalty { amount: i32, reason: String },
    /// Conditions elsewhere in the chart, none on the significators.
    Unaffected { note: String },
}

pub fn assess(
    factors: &SolarFactors,
    chart: &HoraryChart,
    significators: [Planet; 2],
    settings: &HorarySettings,
) -> SolarImpact {
    if !factors.significant {
        return SolarImpact::Nothing;
    }
    if factors.cazimi_count > 0 {
        return SolarImpact::Cazimi {
            bonus: settings.confidence.solar.cazimi_bonus,
        };
    }
    if factors.combustion_ignored || (factors.combustion_count == 0 && factors.under_beams_count == 0) {
        return SolarImpact::Nothing;
    }

    let mut reasons = Vec::new();
    let mut penalty = 0;
    let mut severe = 0;

    for planet in significators {
        let Some(detail) = factors.detail(planet) else {
            continue;
        };
        let distance = detail.distance_from_sun;
        let dignity = chart.planet(planet).dignity_score;

        if detail.condition == SolarCondition::Combustion.name() {
            let (points, grade) = if distance < 1.0 {
                severe += 1;
                (40, "extreme combustion")
            } else if distance < 2.0 {
                (25, "severe combustion")
            } else if distance < 5.0 {
                (15, "combustion")
            } else {
                (10, "light combustion")
            };
            penalty += points;
            let mut reason = format!("{planet} ({grade} at {distance:.1}°)");
            if dignity <= -4 && distance < 3.0 {
                severe += 1;
                reason.push_str(&format!(" (also severely debilitated: {dignity:+})"));
            }
            reasons.push(reason);
        } else if detail.condition == SolarCondition::UnderBeams.name() {
            penalty += settings.confidence.solar.under_beams_penalty;
            reasons.push(format!("{planet} under beams"));
        }
    }

    if settings.solar.severe_impediment_denial_enabled && severe >= 2 {
        return SolarImpact::Denial {
            reason: format!("Multiple severe solar impediments deny perfection: {}", reasons.join(", ")),
        };
    }
    if reasons.is_empty() {
        return SolarImpact::Unaffected {
            note: format!("Solar conditions: {} (significators unaffected)", factors.summary),
        };
    }
    SolarImpact::Penalty {
        amount: penalty.min(50),
        reason: format!("Solar impediment: {}", reasons.join(", ")),
    }
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

//! Denials checked after no perfection was found.

use crate::chart::HoraryChart;
use crate::perfection::ProhibitionFinder;
use crate::question::QuestionType;
use crate::void::VoidChecker;
use crate::western::houses::{traditional_angularity, Angularity};
use crate::western::types::{angular_distance, Planet};
use horary_config::HorarySettings;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Denial {
    /// "prohibition", "frustration_retrograde" or "travel_impediment"
    pub kind: &'static str,
    pub confidence: i32,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prohibiting_planet: Option<Planet>,
}

/// Prohibition, then retrograde frustration when configured, then the
/// travel impediments that apply when Jupiter is the quesited.
pub fn find_denial(
    chart: &HoraryChart,
    settings: &HorarySettings,
    querent: Planet,
    quesited: Planet,
) -> Option<Denial> {
    if let Some(prohibition) = ProhibitionFinder::new(settings).find(chart, querent, quesited) {
        return Some(Denial {
            kind: "prohibition",
            confidence: prohibition.confidence,
            reason: prohibition.reason,
            prohibiting_planet: Some(prohibition.prohibiting_planet),
        });
    }

    let q = chart.planet(querent);
    let qd = chart.planet(quesited);

    if settings.retrograde.automatic_denial && (q.retrograde || qd.retrograde) {
        let who = if q.retrograde { "querent" } else { "quesited" };
        return Some(Denial {
            kind: "frustration_retrograde",
            confidence: settings.confidence.denial.frustration_retrograde,
            reason: format!("Frustration - {who} significator retrograde"),
            prohibiting_planet: None,
        });
    }

    if quesited == Planet::Jupiter {
        let mut warnings = Vec::new();
        if qd.retrograde && qd.dignity_score < 0 {
            warnings.push("Jupiter (travel ruler) retrograde and debilitated");
        }
        if qd.house == 6 {
            warnings.push("Jupiter (travel ruler) in 6th house of illness");
        }
        if q.house == 8 {
            warnings.push("Querent in 8th house (danger/trouble)");
        }
        if chart.planet(Planet::Moon).house == 6 {
            warnings.push("Moon in 6th house (health concerns)");
        }
        if warnings.len() >= 2 {
            return Some(Denial {
                kind: "travel_impediment",
                confidence: 85,
                reason: format!("Travel impediments: {}", warnings.join("; ")),
                prohibiting_planet: None,
            });
        }
    }

    None
}

/// Traditional reasons a lost or stolen thing is not recovered. Empty for
/// every other kind of question.
pub fn theft_loss_denials(
    chart: &HoraryChart,
    settings: &HorarySettings,
    question_type: QuestionType,
    querent: Planet,
    quesited: Planet,
) -> Vec<String> {
    let mut reasons = Vec::new();
    if question_type != QuestionType::LostObject {
        return reasons;
    }

    let q = chart.planet(querent);
    let qd = chart.planet(quesited);

    if quesited == chart.house_ruler(2)
        && traditional_angularity(qd.longitude, &chart.houses, qd.house) == Angularity::Cadent
        && qd.dignity_score <= -5
    {
        reasons.push(format!(
            "L2 ({quesited}) cadent and severely afflicted (dignity {}) - item likely destroyed/irretrievable",
            qd.dignity_score
        ));
    }

    let sun = chart.planet(Planet::Sun).longitude;
    for (planet, role) in [(querent, "querent"), (quesited, "quesited")] {
        if planet == Planet::Sun {
            continue;
        }
        if angular_distance(chart.planet(planet).longitude, sun) <= settings.orbs.combustion_orb {
            reasons.push(format!("Combustion of {role} significator ({planet}) - matter destroyed/hidden"));
        }
    }

    if VoidChecker::new(settings).check(chart).is_effective() {
        reasons.push("Moon void-of-course - no recovery possible".to_string());
    }

    if chart.planet(Planet::Saturn).house == 7 {
        reasons.push("Saturn in 7th house - traditional denial of recovery".to_string());
    }

    if q.dignity_score <= -8 && qd.dignity_score <= -8 {
        reasons.push("Both significators severely debilitated - no planetary strength for recovery".to_string());
    }

    let mars = chart.planet(Planet::Mars);
    if mars.dignity_score >= 3 {
        for planet in [querent, quesited] {
            let separation = angular_distance(mars.longitude, chart.planet(planet).longitude);
            if (172.0..=188.0).contains(&separation) {
                reasons.push(format!("Well-dignified Mars opposes {planet} - theft/loss strongly indicated"));
            }
        }
    }

    reasons
}

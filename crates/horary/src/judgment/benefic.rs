//! Jupiter and Venus aspecting the significators: secondary testimony only.

use super::verdict::Verdict;
use crate::aspects::{format_aspect, Aspect, AspectInfo};
use crate::chart::HoraryChart;
use crate::western::houses::Angularity;
use crate::western::types::Planet;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeneficAspect {
    pub benefic: Planet,
    pub significator: Planet,
    pub aspect: Aspect,
    pub applying: bool,
    pub degrees: f64,
    pub strength: i32,
    pub house_position: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeneficSupport {
    pub verdict: Option<Verdict>,
    pub confidence: i32,
    pub total_score: i32,
    pub aspects: Vec<BeneficAspect>,
    pub reason: String,
}

impl BeneficSupport {
    pub fn favorable(&self) -> bool {
        self.verdict == Some(Verdict::Yes)
    }
}

pub fn benefic_support(chart: &HoraryChart, querent: Planet, quesited: Planet) -> BeneficSupport {
    let significators = [querent, quesited];
    let mut aspects = Vec::new();

    for benefic in [Planet::Jupiter, Planet::Venus] {
        if significators.contains(&benefic) {
            continue;
        }
        for significator in significators {
            for aspect in chart.aspects.iter().filter(|a| a.joins(benefic, significator)) {
                let strength = aspect_strength(chart, benefic, aspect);
                if strength > 0 {
                    aspects.push(BeneficAspect {
                        benefic,
                        significator,
                        aspect: aspect.aspect,
                        applying: aspect.applying,
                        degrees: aspect.degrees_to_exact,
                        strength,
                        house_position: chart.planet(benefic).house,
                    });
                }
            }
        }
    }

    if aspects.is_empty() {
        return BeneficSupport {
            verdict: None,
            confidence: 0,
            total_score: 0,
            aspects,
            reason: "No benefic aspects to significators".to_string(),
        };
    }

    let total: i32 = aspects.iter().map(|a| a.strength).sum();
    let (verdict, confidence) = if total >= 15 {
        (Verdict::Yes, (60 + total).min(85))
    } else if total >= 8 {
        (Verdict::Yes, (55 + total).min(75))
    } else {
        (Verdict::Unclear, 50 + total)
    };
    let reason = aspects
        .iter()
        .reduce(|best, x| if x.strength > best.strength { x } else { best })
        .map(|s| format_aspect(s.benefic, s.aspect, s.significator, s.applying))
        .unwrap_or_default();

    BeneficSupport {
        verdict: Some(verdict),
        confidence,
        total_score: total,
        reason,
        aspects,
    }
}

fn aspect_strength(chart: &HoraryChart, benefic: Planet, aspect: &AspectInfo) -> i32 {
    let position = chart.planet(benefic);
    let mut strength = match aspect.aspect {
        Aspect::Trine => 12,
        Aspect::Conjunction => 10,
        Aspect::Sextile => 8,
        Aspect::Square => 3,
        Aspect::Opposition => 1,
    };

    if aspect.applying {
        strength += 3;
    } else {
        strength = (strength - 2).max(1);
    }

    if aspect.degrees_to_exact <= 3.0 {
        strength += 3;
    } else if aspect.degrees_to_exact <= 6.0 {
        strength += 1;
    }

    strength += match Angularity::of_house(position.house) {
        Angularity::Angular => 4,
        Angularity::Succedent => 2,
        Angularity::Cadent => 0,
    };
    strength += if benefic == Planet::Jupiter { 2 } else { 1 };
    if position.dignity_score > 0 {
        strength += position.dignity_score.min(3);
    }

    strength.max(0)
}

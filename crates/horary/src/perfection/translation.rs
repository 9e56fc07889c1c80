//! Translation of light: a faster planet separates from one significator
//! and applies to the other, carrying the light between them.

use crate::aspects::AspectInfo;
use crate::chart::HoraryChart;
use crate::solar::SolarCondition;
use crate::western::reception::{ReceptionCalculator, ReceptionKind};
use crate::western::types::Planet;
use horary_config::HorarySettings;
use serde::Serialize;

/// Moiety for a planet missing from the configured table.
const DEFAULT_MOIETY: f64 = 8.0;

/// A separation further past exact than this no longer carries light.
const MAX_SEPARATION_PAST_EXACT: f64 = 10.0;

/// An application further from exact than this is too remote to count.
const MAX_APPLICATION_TO_EXACT: f64 = 15.0;

#[derive(Debug, Clone, Serialize)]
pub struct Translation {
    pub translator: Planet,
    pub separates_from: Planet,
    pub applies_to: Planet,
    pub favorable: bool,
    /// The translator's own strength, 35-95.
    pub confidence: i32,
    pub sequence: String,
    /// Display text of the reception with the translator, or "none".
    pub reception: String,
    pub combustion_penalty: i32,
    pub separating_orb: f64,
    pub applying_orb: f64,
}

pub struct TranslationFinder<'a> {
    settings: &'a HorarySettings,
}

impl<'a> TranslationFinder<'a> {
    pub fn new(settings: &'a HorarySettings) -> Self {
        Self { settings }
    }

    pub fn find(&self, chart: &HoraryChart, querent: Planet, quesited: Planet) -> Option<Translation> {
        let rules = &self.settings.moon.translation;
        let q_speed = chart.planet(querent).speed.abs();
        let qd_speed = chart.planet(quesited).speed.abs();

        for candidate in chart.planets.iter() {
            let translator = candidate.planet;
            if translator == querent || translator == quesited {
                continue;
            }
            let speed = candidate.speed.abs();
            if rules.require_speed_advantage && !(speed > q_speed && speed > qd_speed) {
                continue;
            }

            let (Some(to_querent), Some(to_quesited)) = (
                self.last_aspect_within_moieties(chart, translator, querent),
                self.last_aspect_within_moieties(chart, translator, quesited),
            ) else {
                continue;
            };

            let (separating, applying, from, to) = if !to_querent.applying && to_quesited.applying {
                (to_querent, to_quesited, querent, quesited)
            } else if !to_quesited.applying && to_querent.applying {
                (to_quesited, to_querent, quesited, querent)
            } else {
                continue;
            };

            if separating.degrees_to_exact > MAX_SEPARATION_PAST_EXACT
                || applying.degrees_to_exact > MAX_APPLICATION_TO_EXACT
            {
                continue;
            }

            let mut sequence_note = "";
            if rules.require_proper_sequence {
                let intervening = intervening_aspects(chart, translator, from, to, applying.degrees_to_exact);
                if !intervening.is_empty() {
                    log::debug!("{translator} translation blocked by {}", intervening.join(", "));
                    continue;
                }
                sequence_note = " (immediate sequence)";
            }

            let calc = ReceptionCalculator::new(&self.settings.reception);
            let with_querent = calc.compute(chart, translator, querent);
            let with_quesited = calc.compute(chart, translator, quesited);
            let reception = if with_querent.kind != ReceptionKind::None {
                Some(with_querent.display_text)
            } else if with_quesited.kind != ReceptionKind::None {
                Some(with_quesited.display_text)
            } else {
                None
            };

            let mut confidence = 65;
            let mut reception_note = "";
            if reception.is_some() {
                confidence += 10;
                reception_note = " with reception";
            }

            let combustion_penalty = if chart.solar(translator).condition == SolarCondition::Combustion {
                15
            } else {
                0
            };
            confidence -= combustion_penalty;

            let favorable = !(to_querent.aspect.is_hard() || to_quesited.aspect.is_hard());
            if !favorable {
                confidence -= 5;
            }

            return Some(Translation {
                translator,
                separates_from: from,
                applies_to: to,
                favorable,
                confidence: confidence.clamp(35, 95),
                sequence: format!("Separates from {from}, applies to {to}{reception_note}{sequence_note}"),
                reception: reception.unwrap_or_else(|| "none".to_string()),
                combustion_penalty,
                separating_orb: separating.orb,
                applying_orb: applying.orb,
            });
        }

        None
    }

    /// Last aspect in chart order between the two planets whose orb fits
    /// inside the plain sum of their moieties.
    fn last_aspect_within_moieties<'c>(
        &self,
        chart: &'c HoraryChart,
        a: Planet,
        b: Planet,
    ) -> Option<&'c AspectInfo> {
        let limit = self.moiety(a) + self.moiety(b);
        chart
            .aspects
            .iter()
            .filter(|x| x.joins(a, b) && x.orb <= limit)
            .last()
    }

    fn moiety(&self, planet: Planet) -> f64 {
        self.settings.moiety(planet.id()).unwrap_or(DEFAULT_MOIETY)
    }
}

/// Applying aspects of the translator to third planets that perfect
/// before the translating application does.
fn intervening_aspects(
    chart: &HoraryChart,
    translator: Planet,
    from: Planet,
    to: Planet,
    applying_degrees: f64,
) -> Vec<String> {
    chart
        .aspects
        .iter()
        .filter(|x| x.applying && x.degrees_to_exact < applying_degrees)
        .filter_map(|x| x.other(translator).map(|other| (other, x)))
        .filter(|(other, _)| *other != from && *other != to)
        .map(|(other, x)| format!("{} to {other}", x.aspect.symbol()))
        .collect()
}

/// Direction of the light in a sale question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionPattern {
    /// The item's light reaches a party: the sale completes.
    ItemToParty,
    /// A party's light reaches the item: possible, less certain.
    PartyToItem,
}

impl TransactionPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionPattern::ItemToParty => "item_to_party",
            TransactionPattern::PartyToItem => "party_to_item",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionTranslation {
    pub translator: Planet,
    pub pattern: TransactionPattern,
    pub party: Planet,
    /// "seller" or "buyer"
    pub party_role: &'static str,
    pub confidence: i32,
    pub reason: String,
}

impl TranslationFinder<'_> {
    /// Translation between a party (seller or buyer) and the natural
    /// significator of the item for sale.
    pub fn find_transaction(
        &self,
        chart: &HoraryChart,
        seller: Planet,
        buyer: Planet,
        item: Planet,
    ) -> Option<TransactionTranslation> {
        for candidate in chart.planets.iter() {
            let translator = candidate.planet;
            if [seller, buyer, item].contains(&translator) {
                continue;
            }
            let confidence = if chart.solar(translator).condition == SolarCondition::Combustion {
                65
            } else {
                75
            };

            for item_aspect in aspects_joining(chart, translator, item) {
                let parties = aspects_joining(chart, translator, seller).chain(aspects_joining(chart, translator, buyer));
                for party_aspect in parties {
                    let Some(party) = party_aspect.other(translator) else {
                        continue;
                    };
                    let party_role = if party == seller { "seller" } else { "buyer" };

                    if !item_aspect.applying && party_aspect.applying {
                        return Some(TransactionTranslation {
                            translator,
                            pattern: TransactionPattern::ItemToParty,
                            party,
                            party_role,
                            confidence,
                            reason: format!("{translator} translates light from {item} (item) to {party} ({party_role})"),
                        });
                    }
                    if !party_aspect.applying && item_aspect.applying {
                        return Some(TransactionTranslation {
                            translator,
                            pattern: TransactionPattern::PartyToItem,
                            party,
                            party_role,
                            confidence,
                            reason: format!("{translator} translates light from {party} ({party_role}) to {item} (item)"),
                        });
                    }
                }
            }
        }
        None
    }
}

fn aspects_joining<'c>(chart: &'c HoraryChart, a: Planet, b: Planet) -> impl Iterator<Item = &'c AspectInfo> + 'c {
    chart.aspects.iter().filter(move |x| x.joins(a, b))
}

//! Perfection between the significators.
//!
//! Checked in priority order, first conclusive result wins: a direct
//! applying aspect, then (only when there is no direct aspect) translation
//! and collection of light, then mutual reception without an aspect.
//! Prohibition is a separate pass, run by the caller only when a direct
//! aspect was found.

pub mod collection;
pub mod direct;
pub mod prohibition;
pub mod translation;

pub use collection::{Collection, CollectionFinder};
pub use direct::{DirectEvaluation, Frustration};
pub use prohibition::{Prohibition, ProhibitionFinder};
pub use translation::{Translation, TranslationFinder, TransactionPattern, TransactionTranslation};

use crate::aspects::AspectInfo;
use crate::chart::HoraryChart;
use crate::western::reception::{ReceptionCalculator, ReceptionKind, ReceptionResult};
use crate::western::types::Planet;
use horary_config::HorarySettings;
use serde::Serialize;

/// How (or whether) the two significators come together.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PerfectionOutcome {
    /// An applying aspect that completes in sign.
    Direct {
        aspect: AspectInfo,
        reception: ReceptionResult,
        favorable: bool,
        /// Hard aspect without redeeming reception.
        penalized: bool,
        confidence: i32,
        reason: String,
    },
    /// A conjunction with the Sun that burns the other significator.
    CombustionDenial {
        aspect: AspectInfo,
        combust: Planet,
        reception: ReceptionKind,
        confidence: i32,
        reason: String,
    },
    Translation {
        translator: Planet,
        favorable: bool,
        confidence: i32,
        reason: String,
        detail: Translation,
    },
    Collection {
        collector: Planet,
        favorable: bool,
        confidence: i32,
        reason: String,
        detail: Collection,
    },
    /// The Moon and the Sun standing in for an education question.
    CoSignificator {
        aspect: AspectInfo,
        confidence: i32,
        reason: String,
    },
    /// Mutual reception with nothing to carry it.
    ReceptionOnly {
        reception: ReceptionResult,
        confidence: i32,
        reason: String,
    },
    /// A direct aspect that cannot complete before a sign exit or station.
    Frustrated {
        aspect: AspectInfo,
        cause: Frustration,
        reason: String,
    },
    NotFound {
        reason: String,
    },
}

impl PerfectionOutcome {
    pub fn perfects(&self) -> bool {
        matches!(
            self,
            PerfectionOutcome::Direct { .. }
                | PerfectionOutcome::Translation { .. }
                | PerfectionOutcome::Collection { .. }
                | PerfectionOutcome::CoSignificator { .. }
        )
    }

    pub fn favorable(&self) -> bool {
        match self {
            PerfectionOutcome::Direct { favorable, .. }
            | PerfectionOutcome::Translation { favorable, .. }
            | PerfectionOutcome::Collection { favorable, .. } => *favorable,
            PerfectionOutcome::CoSignificator { .. } | PerfectionOutcome::ReceptionOnly { .. } => true,
            _ => false,
        }
    }

    pub fn confidence(&self) -> Option<i32> {
        match self {
            PerfectionOutcome::Direct { confidence, .. }
            | PerfectionOutcome::CombustionDenial { confidence, .. }
            | PerfectionOutcome::Translation { confidence, .. }
            | PerfectionOutcome::Collection { confidence, .. }
            | PerfectionOutcome::CoSignificator { confidence, .. }
            | PerfectionOutcome::ReceptionOnly { confidence, .. } => Some(*confidence),
            PerfectionOutcome::Frustrated { .. } | PerfectionOutcome::NotFound { .. } => None,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            PerfectionOutcome::Direct { reason, .. }
            | PerfectionOutcome::CombustionDenial { reason, .. }
            | PerfectionOutcome::Translation { reason, .. }
            | PerfectionOutcome::Collection { reason, .. }
            | PerfectionOutcome::CoSignificator { reason, .. }
            | PerfectionOutcome::ReceptionOnly { reason, .. }
            | PerfectionOutcome::Frustrated { reason, .. }
            | PerfectionOutcome::NotFound { reason } => reason,
        }
    }

    /// Label used in the traditional factors block.
    pub fn kind(&self) -> &'static str {
        match self {
            PerfectionOutcome::Direct { penalized: true, .. } => "direct_penalized",
            PerfectionOutcome::Direct { .. } => "direct",
            PerfectionOutcome::CombustionDenial { .. } => "combustion_denial",
            PerfectionOutcome::Translation { .. } => "translation",
            PerfectionOutcome::Collection { .. } => "collection",
            PerfectionOutcome::CoSignificator { .. } => "moon_sun_education",
            PerfectionOutcome::ReceptionOnly { .. } => "reception",
            PerfectionOutcome::Frustrated { .. } => "frustrated",
            PerfectionOutcome::NotFound { .. } => "none",
        }
    }

    /// The significators' own aspect, when one carries the outcome.
    pub fn aspect(&self) -> Option<&AspectInfo> {
        match self {
            PerfectionOutcome::Direct { aspect, .. }
            | PerfectionOutcome::CombustionDenial { aspect, .. }
            | PerfectionOutcome::CoSignificator { aspect, .. }
            | PerfectionOutcome::Frustrated { aspect, .. } => Some(aspect),
            _ => None,
        }
    }

    /// Whether prohibition has to be checked against this outcome.
    pub fn has_direct_aspect(&self) -> bool {
        matches!(self, PerfectionOutcome::Direct { .. })
    }

    pub fn reception_label(&self) -> String {
        match self {
            PerfectionOutcome::Direct { reception, .. } | PerfectionOutcome::ReceptionOnly { reception, .. } => {
                reception.kind.as_str().to_string()
            }
            PerfectionOutcome::CombustionDenial { reception, .. } => reception.as_str().to_string(),
            PerfectionOutcome::Translation { detail, .. } => detail.reception.clone(),
            PerfectionOutcome::Collection { .. } => "both_receive_collector".to_string(),
            _ => "none".to_string(),
        }
    }
}

pub struct PerfectionEngine<'a> {
    settings: &'a HorarySettings,
    exaltation_boost: f64,
}

impl<'a> PerfectionEngine<'a> {
    pub fn new(settings: &'a HorarySettings, exaltation_boost: f64) -> Self {
        Self {
            settings,
            exaltation_boost,
        }
    }

    pub fn evaluate(&self, chart: &HoraryChart, querent: Planet, quesited: Planet) -> PerfectionOutcome {
        let direct = DirectEvaluation::new(self.settings, self.exaltation_boost);
        let mut frustrated = None;

        if let Some(aspect) = chart.applying_aspect(querent, quesited) {
            match direct.evaluate(chart, querent, quesited, aspect) {
                PerfectionOutcome::Frustrated { aspect, cause, reason } => {
                    frustrated = Some(PerfectionOutcome::Frustrated { aspect, cause, reason });
                }
                outcome => return outcome,
            }
        } else {
            let tiers = &self.settings.confidence.perfection;

            if let Some(found) = TranslationFinder::new(self.settings).find(chart, querent, quesited) {
                return PerfectionOutcome::Translation {
                    translator: found.translator,
                    favorable: found.favorable,
                    confidence: tiers.translation_of_light,
                    reason: format!("Translation of light by {} - {}", found.translator, found.sequence),
                    detail: found,
                };
            }

            if let Some(found) = CollectionFinder::new(self.settings).find(chart, querent, quesited) {
                return PerfectionOutcome::Collection {
                    collector: found.collector,
                    favorable: found.favorable,
                    confidence: tiers.collection_of_light,
                    reason: format!("Collection of light by {}", found.collector),
                    detail: found,
                };
            }
        }

        if let Some(outcome) = self.reception_only(chart, querent, quesited) {
            return outcome;
        }

        frustrated.unwrap_or_else(|| PerfectionOutcome::NotFound {
            reason: "No perfection found between significators".to_string(),
        })
    }

    fn reception_only(&self, chart: &HoraryChart, querent: Planet, quesited: Planet) -> Option<PerfectionOutcome> {
        let reception = ReceptionCalculator::new(&self.settings.reception).compute(chart, querent, quesited);
        let base = self.settings.confidence.perfection.reception_only;

        match reception.kind {
            ReceptionKind::MutualRulership => Some(PerfectionOutcome::ReceptionOnly {
                confidence: base,
                reason: format!("Reception: {} - needs aspect or translation", reception.display_text),
                reception,
            }),
            ReceptionKind::MutualExaltation => Some(PerfectionOutcome::ReceptionOnly {
                confidence: (base as f64 + self.exaltation_boost).min(100.0) as i32,
                reason: format!(
                    "Reception: {} (+{}% confidence) - needs aspect or translation",
                    reception.display_text, self.exaltation_boost
                ),
                reception,
            }),
            _ => None,
        }
    }

    /// Education questions: the Moon (co-significator of the querent) to
    /// the Sun (examiner). Applying beats recently separated.
    pub fn moon_sun_education(&self, chart: &HoraryChart) -> Option<PerfectionOutcome> {
        if let Some(aspect) = chart.applying_aspect(Planet::Moon, Planet::Sun) {
            if aspect.aspect.is_favorable() {
                return Some(PerfectionOutcome::CoSignificator {
                    aspect: aspect.clone(),
                    confidence: 75,
                    reason: format!(
                        "Moon (co-significator) applying {} to Sun (examiner/authority)",
                        aspect.aspect
                    ),
                });
            }
        }
        if let Some(aspect) = chart.separating_aspect(Planet::Moon, Planet::Sun) {
            if aspect.aspect.is_favorable() {
                return Some(PerfectionOutcome::CoSignificator {
                    aspect: aspect.clone(),
                    confidence: 65,
                    reason: format!(
                        "Moon (co-significator) recently separated from {} to Sun (examiner/authority)",
                        aspect.aspect
                    ),
                });
            }
        }
        None
    }
}

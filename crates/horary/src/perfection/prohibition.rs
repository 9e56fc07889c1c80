//! Prohibition: a third planet reaches a significator first and blocks
//! the pending perfection.

use crate::chart::HoraryChart;
use crate::western::reception::ReceptionCalculator;
use crate::western::types::Planet;
use horary_config::HorarySettings;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Prohibition {
    pub prohibiting_planet: Planet,
    pub target_significator: Planet,
    pub confidence: i32,
    pub reason: String,
    /// The prohibited significator receives the prohibitor.
    pub reception: bool,
    /// "general", "Saturn", "Mars", optionally "... with reception"
    pub kind: String,
}

pub struct ProhibitionFinder<'a> {
    settings: &'a HorarySettings,
}

impl<'a> ProhibitionFinder<'a> {
    pub fn new(settings: &'a HorarySettings) -> Self {
        Self { settings }
    }

    /// Only meaningful while the significators have an applying aspect.
    pub fn find(&self, chart: &HoraryChart, querent: Planet, quesited: Planet) -> Option<Prohibition> {
        let main = chart.applying_aspect(querent, quesited)?;
        let main_days = days_to_perfect(chart, querent, quesited, main.degrees_to_exact);
        let significators = [querent, quesited];

        for aspect in chart.aspects.iter().filter(|a| a.applying) {
            let (target, prohibitor) = match (
                significators.contains(&aspect.planet1),
                significators.contains(&aspect.planet2),
            ) {
                (true, false) => (aspect.planet1, aspect.planet2),
                (false, true) => (aspect.planet2, aspect.planet1),
                _ => continue,
            };

            let days = days_to_perfect(chart, target, prohibitor, aspect.degrees_to_exact);
            if days >= main_days {
                continue;
            }

            let mut confidence = self.settings.confidence.denial.prohibition;
            let mut kind = match prohibitor {
                Planet::Saturn => {
                    confidence += 10;
                    "Saturn".to_string()
                }
                Planet::Mars => {
                    confidence += 5;
                    "Mars".to_string()
                }
                _ => "general".to_string(),
            };

            let reception = ReceptionCalculator::new(&self.settings.reception).receives(chart, target, prohibitor);
            if reception {
                confidence -= 15;
                kind.push_str(" with reception");
            }

            log::debug!("{prohibitor} prohibits {target}: {days:.2} days against {main_days:.2}");
            return Some(Prohibition {
                prohibiting_planet: prohibitor,
                target_significator: target,
                confidence: confidence.min(85),
                reason: format!("Prohibition by {prohibitor} - aspects {target} before significator perfection"),
                reception,
                kind,
            });
        }

        None
    }
}

fn days_to_perfect(chart: &HoraryChart, a: Planet, b: Planet, degrees_to_exact: f64) -> f64 {
    let relative = (chart.planet(a).speed - chart.planet(b).speed).abs();
    if relative > 0.0 {
        degrees_to_exact / relative
    } else {
        f64::INFINITY
    }
}

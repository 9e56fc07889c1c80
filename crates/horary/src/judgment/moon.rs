//! The Moon's testimony: her next aspect, her aspects to the significators
//! and her own condition.

use super::verdict::Verdict;
use crate::aspects::{format_aspect, format_timing_description, Aspect};
use crate::chart::HoraryChart;
use crate::void::VoidChecker;
use crate::western::houses::Angularity;
use crate::western::reception::{ReceptionCalculator, ReceptionKind};
use crate::western::types::{normalize_degrees, Planet};
use horary_config::{HorarySettings, LunarConfidenceCaps};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    /// From the Moon's distance ahead of the Sun along the zodiac.
    pub fn from_elongation(elongation: f64) -> Self {
        match normalize_degrees(elongation) {
            e if e < 30.0 => MoonPhase::NewMoon,
            e if e < 60.0 => MoonPhase::WaxingCrescent,
            e if e < 120.0 => MoonPhase::FirstQuarter,
            e if e < 150.0 => MoonPhase::WaxingGibbous,
            e if e < 210.0 => MoonPhase::FullMoon,
            e if e < 240.0 => MoonPhase::WaningGibbous,
            e if e < 300.0 => MoonPhase::LastQuarter,
            _ => MoonPhase::WaningCrescent,
        }
    }

    pub fn of_chart(chart: &HoraryChart) -> Self {
        Self::from_elongation(chart.planet(Planet::Moon).longitude - chart.planet(Planet::Sun).longitude)
    }

    pub fn name(&self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::FullMoon => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }

    fn bonus(&self, settings: &HorarySettings) -> i32 {
        let b = &settings.moon.phase_bonus;
        match self {
            MoonPhase::NewMoon => b.new_moon,
            MoonPhase::WaxingCrescent => b.waxing_crescent,
            MoonPhase::FirstQuarter => b.first_quarter,
            MoonPhase::WaxingGibbous => b.waxing_gibbous,
            MoonPhase::FullMoon => b.full_moon,
            MoonPhase::WaningGibbous => b.waning_gibbous,
            MoonPhase::LastQuarter => b.last_quarter,
            MoonPhase::WaningCrescent => b.waning_crescent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoonSpeed {
    VerySlow,
    Slow,
    Average,
    Fast,
    VeryFast,
}

impl MoonSpeed {
    pub fn from_speed(speed: f64) -> Self {
        match speed.abs() {
            s if s < 11.0 => MoonSpeed::VerySlow,
            s if s < 12.0 => MoonSpeed::Slow,
            s if s < 14.0 => MoonSpeed::Average,
            s if s < 15.0 => MoonSpeed::Fast,
            _ => MoonSpeed::VeryFast,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MoonSpeed::VerySlow => "Very Slow",
            MoonSpeed::Slow => "Slow",
            MoonSpeed::Average => "Average",
            MoonSpeed::Fast => "Fast",
            MoonSpeed::VeryFast => "Very Fast",
        }
    }

    fn bonus(&self, settings: &HorarySettings) -> i32 {
        let b = &settings.moon.speed_bonus;
        match self {
            MoonSpeed::VerySlow => b.very_slow,
            MoonSpeed::Slow => b.slow,
            MoonSpeed::Average => b.average,
            MoonSpeed::Fast => b.fast,
            MoonSpeed::VeryFast => b.very_fast,
        }
    }
}

/// Essential dignity plus the phase, speed and angularity bonuses.
pub fn adjusted_dignity(chart: &HoraryChart, settings: &HorarySettings) -> i32 {
    let moon = chart.planet(Planet::Moon);
    let angularity = match Angularity::of_house(moon.house) {
        Angularity::Angular => settings.moon.angularity_bonus.angular,
        Angularity::Succedent => settings.moon.angularity_bonus.succedent,
        Angularity::Cadent => settings.moon.angularity_bonus.cadent,
    };
    moon.dignity_score
        + MoonPhase::of_chart(chart).bonus(settings)
        + MoonSpeed::from_speed(moon.speed).bonus(settings)
        + angularity
}

/// The Moon's next aspect, when it falls on a significator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoonNext {
    pub verdict: Verdict,
    pub confidence: i32,
    pub decisive: bool,
    pub reason: String,
    pub timing: String,
    pub reception: ReceptionKind,
    pub void_moon: bool,
}

pub fn moon_next(
    chart: &HoraryChart,
    settings: &HorarySettings,
    significators: [Planet; 2],
    ignore_void_moon: bool,
) -> Option<MoonNext> {
    let next = chart.moon_next_aspect.as_ref()?;
    if !significators.contains(&next.planet) {
        return None;
    }

    let void_moon = !ignore_void_moon && VoidChecker::new(settings).check(chart).is_effective();
    let favorable = next.aspect.is_favorable();

    let mut confidence = if favorable { 75 } else { 65 };
    if next.applying && favorable {
        confidence += 20;
    }
    if void_moon {
        confidence -= 15;
    }
    if next.orb <= 1.0 {
        confidence += 10;
    }

    let mut verdict = Verdict::from_favorable(favorable);
    let reception = ReceptionCalculator::new(&settings.reception)
        .compute(chart, Planet::Moon, next.planet)
        .kind;
    if reception != ReceptionKind::None && !favorable {
        confidence += 10;
        verdict = Verdict::Unclear;
    }

    Some(MoonNext {
        verdict,
        confidence: confidence.clamp(0, 100),
        decisive: !(void_moon && !favorable),
        reason: format!(
            "Moon next {}s {} in {}",
            next.aspect.display_name(),
            next.planet,
            next.perfection_eta_description
        ),
        timing: next.perfection_eta_description.clone(),
        reception,
        void_moon,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestimonyKind {
    Significator,
    MoonToBenefic,
    PlanetInHouse,
}

/// One Moon aspect that testifies to the matter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoonTestimonyAspect {
    pub planet: Planet,
    pub aspect: Aspect,
    pub applying: bool,
    pub favorable: bool,
    pub house_role: String,
    pub description: String,
    pub testimony_type: TestimonyKind,
    #[serde(skip)]
    degrees_to_exact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoonTestimony {
    pub favorable: bool,
    pub unfavorable: bool,
    pub reason: String,
    pub confidence: i32,
    pub timing: Option<String>,
    pub void_of_course: bool,
    /// Filled only when the Moon applies to at least one testimony.
    pub aspects: Vec<MoonTestimonyAspect>,
}

impl MoonTestimony {
    /// First Moon-to-benefic testimony, if any.
    pub fn benefic_testimony(&self) -> Option<&MoonTestimonyAspect> {
        self.aspects.iter().find(|a| a.testimony_type == TestimonyKind::MoonToBenefic)
    }
}

fn capped(caps: &LunarConfidenceCaps, favorable: bool, void_moon: bool) -> i32 {
    let base = if favorable { caps.favorable } else { caps.unfavorable };
    if void_moon {
        base.min(caps.neutral)
    } else {
        base
    }
}

pub fn moon_testimony(
    chart: &HoraryChart,
    settings: &HorarySettings,
    querent: Planet,
    quesited: Planet,
    ignore_void_moon: bool,
) -> MoonTestimony {
    let caps = &settings.confidence.lunar_confidence_caps;
    let moon = chart.planet(Planet::Moon);

    let void_check = VoidChecker::new(settings).check(chart);
    let void_moon = !ignore_void_moon && void_check.is_effective();
    let adjusted = adjusted_dignity(chart, settings);

    let quesited_house = first_house_ruled(chart, quesited);
    let mut testimonies = Vec::new();

    for aspect in chart.aspects.iter() {
        let Some(other) = aspect.other(Planet::Moon) else {
            continue;
        };
        let shown = format_aspect(Planet::Moon, aspect.aspect, other, aspect.applying);

        let (house_role, description, testimony_type) = if other == querent || other == quesited {
            let role = if other == querent {
                "querent (L1)".to_string()
            } else {
                quesited_house.map_or_else(|| "quesited".to_string(), |h| format!("L{h}"))
            };
            (role.clone(), format!("{shown} ({role})"), TestimonyKind::Significator)
        } else if matches!(other, Planet::Jupiter | Planet::Venus | Planet::Sun) {
            (
                format!("benefic in {}th house", chart.planet(other).house),
                format!("{shown} (Moon to benefic {other})"),
                TestimonyKind::MoonToBenefic,
            )
        } else if quesited_house == Some(chart.planet(other).house) {
            let house = chart.planet(other).house;
            (
                format!("planet in {house}th house"),
                format!("{shown} (planet in {house}th house)"),
                TestimonyKind::PlanetInHouse,
            )
        } else {
            continue;
        };

        testimonies.push(MoonTestimonyAspect {
            planet: other,
            aspect: aspect.aspect,
            applying: aspect.applying,
            favorable: aspect.aspect.is_favorable(),
            house_role,
            description,
            testimony_type,
            degrees_to_exact: aspect.degrees_to_exact,
        });
    }

    let applying: Vec<&MoonTestimonyAspect> = testimonies.iter().filter(|t| t.applying).collect();
    if let Some(primary) = applying
        .iter()
        .min_by(|a, b| a.degrees_to_exact.total_cmp(&b.degrees_to_exact))
    {
        let favorable = primary.favorable;
        let descriptions: Vec<&str> = applying.iter().map(|t| t.description.as_str()).collect();
        return MoonTestimony {
            favorable,
            unfavorable: !favorable,
            reason: format!("Moon testimony: {}", descriptions.join(", ")),
            confidence: capped(caps, favorable, void_moon),
            timing: Some("Within days".to_string()),
            void_of_course: void_moon,
            aspects: testimonies.clone(),
        };
    }

    if let Some(next) = chart
        .moon_next_aspect
        .as_ref()
        .filter(|n| n.planet == querent || n.planet == quesited)
    {
        let favorable = next.aspect.is_favorable();
        return MoonTestimony {
            favorable,
            unfavorable: !favorable,
            reason: format!(
                "Moon next {}s {} (total dignity: {adjusted:+})",
                next.aspect.display_name(),
                next.planet
            ),
            confidence: capped(caps, favorable, void_moon),
            timing: Some(next.perfection_eta_description.clone()),
            void_of_course: false,
            aspects: Vec::new(),
        };
    }

    let (favorable, unfavorable) = (adjusted > 0, adjusted < -3);
    let mut reason = if favorable {
        format!("Moon well-dignified in {} (adjusted dignity: {adjusted:+})", moon.sign)
    } else if unfavorable {
        format!("Moon poorly dignified in {} (adjusted dignity: {adjusted:+})", moon.sign)
    } else {
        format!("Moon testimony neutral (adjusted dignity: {adjusted:+})")
    };
    if void_moon {
        if favorable {
            reason.push_str(&format!(" - BUT Moon void of course ({}) - reduces effectiveness", void_check.reason));
        } else {
            reason.push_str(&format!(" - Moon void of course ({})", void_check.reason));
        }
    }

    let mut confidence = if favorable {
        caps.favorable
    } else if unfavorable {
        caps.unfavorable
    } else {
        caps.neutral
    };
    if void_moon {
        confidence = confidence.min(caps.neutral);
    }

    MoonTestimony {
        favorable,
        unfavorable,
        reason,
        confidence,
        timing: None,
        void_of_course: void_moon,
        aspects: Vec::new(),
    }
}

/// Lowest-numbered house whose cusp `planet` rules.
pub fn first_house_ruled(chart: &HoraryChart, planet: Planet) -> Option<u8> {
    (1..=12u8).find(|h| chart.house_ruler(*h) == planet)
}

/// Every house whose cusp `planet` rules.
pub fn houses_ruled(chart: &HoraryChart, planet: Planet) -> Vec<u8> {
    (1..=12u8).filter(|h| chart.house_ruler(*h) == planet).collect()
}

/// "Within 3 days" from degrees to exact over the Moon's real motion.
pub fn lunar_timing(chart: &HoraryChart, degrees_to_exact: f64) -> String {
    let speed = chart.sky.moon_speed;
    if speed > 0.0 {
        format_timing_description(degrees_to_exact / speed)
    } else {
        "Timing uncertain".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_uses_direction() {
        assert_eq!(MoonPhase::from_elongation(45.0), MoonPhase::WaxingCrescent);
        assert_eq!(MoonPhase::from_elongation(-45.0), MoonPhase::LastQuarter);
        assert_eq!(MoonPhase::from_elongation(180.0), MoonPhase::FullMoon);
        assert_eq!(MoonPhase::from_elongation(350.0).name(), "Waning Crescent");
    }

    #[test]
    fn test_speed_buckets() {
        assert_eq!(MoonSpeed::from_speed(10.9), MoonSpeed::VerySlow);
        assert_eq!(MoonSpeed::from_speed(13.2).label(), "Average");
        assert_eq!(MoonSpeed::from_speed(-15.1), MoonSpeed::VeryFast);
    }
}

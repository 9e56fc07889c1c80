//! The judgment payload: verdict, reasoning and the chart it was read from.

use super::audit::ExplanationAudit;
use super::moon::{lunar_timing, MoonPhase, MoonSpeed};
use super::solar_factors::{round_to, SolarFactors};
use super::verdict::{TraditionalFactors, Verdict};
use crate::aspects::LunarAspect;
use crate::chart::{day_ruler, hour_ruler, HoraryChart};
use crate::question::QuestionAnalysis;
use crate::radicality::RadicalityChecker;
use crate::solar::SolarCondition;
use crate::void::VoidChecker;
use crate::western::types::{degree_in_sign, Planet};
use chrono::{Datelike, Timelike};
use horary_config::HorarySettings;
use serde::Serialize;
use std::collections::BTreeMap;

pub const LUNAR_MANSIONS: [&str; 28] = [
    "Al Sharatain",
    "Al Butain",
    "Al Thurayya",
    "Al Dabaran",
    "Al Hak'ah",
    "Al Han'ah",
    "Al Dhira",
    "Al Nathrah",
    "Al Tarf",
    "Al Jabhah",
    "Al Zubrah",
    "Al Sarfah",
    "Al Awwa",
    "Al Simak",
    "Al Ghafr",
    "Al Jubana",
    "Iklil",
    "Al Qalb",
    "Al Shaula",
    "Al Na'am",
    "Al Baldah",
    "Sa'd al Dhabih",
    "Sa'd Bula",
    "Sa'd al Su'ud",
    "Sa'd al Akhbiya",
    "Al Fargh al Mukdim",
    "Al Fargh al Thani",
    "Batn al Hut",
];

#[derive(Debug, Clone, Serialize)]
pub struct SolarConditionData {
    pub condition: &'static str,
    pub distance_from_sun: f64,
    pub dignity_effect: i32,
    pub description: &'static str,
    pub exact_cazimi: bool,
    pub traditional_exception: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanetData {
    pub longitude: f64,
    pub latitude: f64,
    pub house: u8,
    pub sign: &'static str,
    pub dignity_score: i32,
    pub retrograde: bool,
    pub speed: f64,
    pub degree_in_sign: f64,
    pub solar_condition: SolarConditionData,
}

#[derive(Debug, Clone, Serialize)]
pub struct AspectData {
    pub planet1: Planet,
    pub planet2: Planet,
    pub aspect: &'static str,
    pub orb: f64,
    pub applying: bool,
    pub degrees_to_exact: f64,
    pub exact_time: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SolarSummaryEntry {
    pub planet: Planet,
    pub distance_from_sun: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact_cazimi: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traditional_exception: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dignity_effect: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SolarConditionsSummary {
    pub cazimi_planets: Vec<SolarSummaryEntry>,
    pub combusted_planets: Vec<SolarSummaryEntry>,
    pub under_beams_planets: Vec<SolarSummaryEntry>,
    pub free_planets: Vec<SolarSummaryEntry>,
    pub significant_conditions: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimezoneInfo {
    pub local_time: String,
    pub utc_time: String,
    pub timezone: String,
    pub location_name: String,
    pub coordinates: Coordinates,
}

impl From<&HoraryChart> for TimezoneInfo {
    fn from(chart: &HoraryChart) -> Self {
        Self {
            local_time: chart.date_time.to_rfc3339(),
            utc_time: chart.date_time_utc.to_rfc3339(),
            timezone: chart.timezone_info.clone(),
            location_name: chart.location_name.clone(),
            coordinates: Coordinates {
                latitude: chart.location.lat,
                longitude: chart.location.lon,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LunarAspectData {
    pub planet: Planet,
    pub aspect: &'static str,
    pub orb: f64,
    pub degrees_difference: f64,
    pub perfection_eta_days: f64,
    pub perfection_eta_description: String,
    pub applying: bool,
}

impl From<&LunarAspect> for LunarAspectData {
    fn from(aspect: &LunarAspect) -> Self {
        Self {
            planet: aspect.planet,
            aspect: aspect.aspect.display_name(),
            orb: round_to(aspect.orb, 2),
            degrees_difference: round_to(aspect.degrees_difference, 2),
            perfection_eta_days: round_to(aspect.perfection_eta_days, 2),
            perfection_eta_description: aspect.perfection_eta_description.clone(),
            applying: aspect.applying,
        }
    }
}

/// Chart snapshot in the shape a front end draws from.
#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub planets: BTreeMap<String, PlanetData>,
    pub aspects: Vec<AspectData>,
    pub houses: Vec<f64>,
    pub house_rulers: BTreeMap<String, Planet>,
    pub ascendant: f64,
    pub midheaven: f64,
    pub solar_conditions_summary: SolarConditionsSummary,
    pub timezone_info: TimezoneInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moon_last_aspect: Option<LunarAspectData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moon_next_aspect: Option<LunarAspectData>,
}

impl From<&HoraryChart> for ChartData {
    fn from(chart: &HoraryChart) -> Self {
        let mut planets = BTreeMap::new();
        let mut summary = SolarConditionsSummary::default();

        for position in chart.planets.iter() {
            let solar = chart.solar(position.planet);
            planets.insert(
                position.planet.name().to_string(),
                PlanetData {
                    longitude: position.longitude,
                    latitude: position.latitude,
                    house: position.house,
                    sign: position.sign.name(),
                    dignity_score: position.dignity_score,
                    retrograde: position.retrograde,
                    speed: position.speed,
                    degree_in_sign: degree_in_sign(position.longitude),
                    solar_condition: SolarConditionData {
                        condition: solar.condition.name(),
                        distance_from_sun: round_to(solar.distance_from_sun, 4),
                        dignity_effect: solar.condition.dignity_modifier(),
                        description: solar.condition.description(),
                        exact_cazimi: solar.exact_cazimi,
                        traditional_exception: solar.traditional_exception,
                    },
                },
            );

            let mut entry = SolarSummaryEntry {
                planet: position.planet,
                distance_from_sun: round_to(solar.distance_from_sun, 4),
                exact_cazimi: None,
                traditional_exception: None,
                dignity_effect: None,
            };
            match solar.condition {
                SolarCondition::Cazimi => {
                    entry.exact_cazimi = Some(solar.exact_cazimi);
                    entry.dignity_effect = Some(solar.condition.dignity_modifier());
                    summary.cazimi_planets.push(entry);
                }
                SolarCondition::Combustion => {
                    entry.traditional_exception = Some(solar.traditional_exception);
                    entry.dignity_effect = Some(solar.condition.dignity_modifier());
                    summary.combusted_planets.push(entry);
                }
                SolarCondition::UnderBeams => {
                    entry.dignity_effect = Some(solar.condition.dignity_modifier());
                    summary.under_beams_planets.push(entry);
                }
                SolarCondition::Free => summary.free_planets.push(entry),
            }
        }
        summary.significant_conditions =
            summary.cazimi_planets.len() + summary.combusted_planets.len() + summary.under_beams_planets.len();

        let aspects = chart
            .aspects
            .iter()
            .map(|a| AspectData {
                planet1: a.planet1,
                planet2: a.planet2,
                aspect: a.aspect.display_name(),
                orb: round_to(a.orb, 2),
                applying: a.applying,
                degrees_to_exact: round_to(a.degrees_to_exact, 2),
                exact_time: a.exact_time.map(|t| t.to_rfc3339()),
            })
            .collect();

        let house_rulers = (1..=12u8)
            .map(|h| (h.to_string(), chart.house_ruler(h)))
            .collect();

        ChartData {
            planets,
            aspects,
            houses: chart.houses.iter().map(|c| round_to(*c, 2)).collect(),
            house_rulers,
            ascendant: round_to(chart.ascendant, 4),
            midheaven: round_to(chart.midheaven, 4),
            solar_conditions_summary: summary,
            timezone_info: TimezoneInfo::from(chart),
            moon_last_aspect: chart.moon_last_aspect.as_ref().map(LunarAspectData::from),
            moon_next_aspect: chart.moon_next_aspect.as_ref().map(LunarAspectData::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MoonMansion {
    pub number: usize,
    pub name: &'static str,
}

impl MoonMansion {
    pub fn of_longitude(longitude: f64) -> Self {
        let index = ((longitude.rem_euclid(360.0) / (360.0 / 28.0)) as usize).min(27);
        Self {
            number: index + 1,
            name: LUNAR_MANSIONS[index],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MoonCondition {
    pub sign: &'static str,
    pub speed: f64,
    pub speed_category: &'static str,
    pub void_of_course: bool,
    pub void_reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneralInfo {
    pub planetary_day: Planet,
    pub planetary_hour: Planet,
    pub moon_phase: &'static str,
    pub moon_mansion: MoonMansion,
    pub moon_condition: MoonCondition,
}

impl GeneralInfo {
    pub fn of_chart(chart: &HoraryChart, settings: &HorarySettings) -> Self {
        let (planetary_day, planetary_hour) = match chart.sky.planetary_hour {
            Some(hour) => (hour.day_ruler, hour.hour_ruler),
            None => {
                // clock hours from midnight when there is no sunrise
                let day = day_ruler(chart.date_time.weekday().num_days_from_monday());
                (day, hour_ruler(day, chart.date_time.hour() as u8))
            }
        };
        let moon = chart.planet(Planet::Moon);
        let void = VoidChecker::new(settings).check(chart);

        Self {
            planetary_day,
            planetary_hour,
            moon_phase: MoonPhase::of_chart(chart).name(),
            moon_mansion: MoonMansion::of_longitude(moon.longitude),
            moon_condition: MoonCondition {
                sign: moon.sign.name(),
                speed: moon.speed,
                speed_category: MoonSpeed::from_speed(moon.speed).label(),
                void_of_course: void.void,
                void_reason: void.reason,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Considerations {
    pub radical: bool,
    pub radical_reason: String,
    pub moon_void: bool,
    pub moon_void_reason: String,
}

impl Considerations {
    pub fn of_chart(chart: &HoraryChart, settings: &HorarySettings) -> Self {
        let radicality = RadicalityChecker::new(&settings.radicality).check(chart, false);
        let void = VoidChecker::new(settings).check(chart);
        Self {
            radical: radicality.valid,
            radical_reason: radicality.reason,
            moon_void: void.void,
            moon_void_reason: void.reason,
        }
    }
}

/// One of the Moon's current aspects with its timing.
#[derive(Debug, Clone, Serialize)]
pub struct MoonStoryEntry {
    pub planet: Planet,
    pub aspect: &'static str,
    pub orb: f64,
    pub applying: bool,
    pub status: &'static str,
    pub timing: String,
    pub days_to_perfect: f64,
}

/// Applying aspects soonest first, separating ones by orb.
pub fn moon_story(chart: &HoraryChart) -> Vec<MoonStoryEntry> {
    let speed = chart.sky.moon_speed;
    let mut story: Vec<MoonStoryEntry> = chart
        .aspects
        .iter()
        .filter_map(|a| a.other(Planet::Moon).map(|other| (other, a)))
        .map(|(other, a)| {
            let (timing, days) = if a.applying {
                let days = if speed > 0.0 { a.degrees_to_exact / speed } else { 0.0 };
                (lunar_timing(chart, a.degrees_to_exact), days)
            } else {
                ("Past".to_string(), 0.0)
            };
            MoonStoryEntry {
                planet: other,
                aspect: a.aspect.display_name(),
                orb: a.orb,
                applying: a.applying,
                status: if a.applying { "applying" } else { "separating" },
                timing,
                days_to_perfect: days,
            }
        })
        .collect();

    story.sort_by(|a, b| {
        let key = |e: &MoonStoryEntry| if e.applying { e.days_to_perfect } else { e.orb };
        key(a).total_cmp(&key(b))
    });
    story
}

/// Everything `HoraryEngine::judge` returns.
#[derive(Debug, Clone, Serialize)]
pub struct JudgmentResult {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub question: String,
    pub judgment: Verdict,
    pub confidence: i32,
    pub reasoning: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<ChartData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_analysis: Option<QuestionAnalysis>,
    pub timing: Option<String>,
    pub moon_aspects: Vec<MoonStoryEntry>,
    pub traditional_factors: TraditionalFactors,
    pub solar_factors: Option<SolarFactors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_info: Option<GeneralInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub considerations: Option<Considerations>,
    pub moon_last_aspect: Option<LunarAspectData>,
    pub moon_next_aspect: Option<LunarAspectData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone_info: Option<TimezoneInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation_audit: Option<ExplanationAudit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<&'static str>,
}

impl JudgmentResult {
    /// A failed judgment: `LOCATION_ERROR` or `ERROR` with confidence 0.
    pub fn failure(question: &str, verdict: Verdict, reasoning: String, error: String, error_type: Option<&'static str>) -> Self {
        Self {
            question: question.to_string(),
            judgment: verdict,
            confidence: 0,
            reasoning: vec![reasoning],
            chart_data: None,
            question_analysis: None,
            timing: None,
            moon_aspects: Vec::new(),
            traditional_factors: TraditionalFactors::default(),
            solar_factors: None,
            general_info: None,
            considerations: None,
            moon_last_aspect: None,
            moon_next_aspect: None,
            timezone_info: None,
            explanation_audit: None,
            error: Some(error),
            error_type,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mansions() {
        assert_eq!(MoonMansion::of_longitude(0.0).name, "Al Sharatain");
        assert_eq!(MoonMansion::of_longitude(13.0).number, 2);
        let last = MoonMansion::of_longitude(359.9);
        assert_eq!((last.number, last.name), (28, "Batn al Hut"));
    }
}

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::{
    AngularityBonus, ConfidenceSettings, DegreeSpan, DenialConfidence, DignitySettings,
    HorarySettings, HourAgreementMode, LocationEntry, LunarConfidenceCaps, MoonSettings,
    OrbSettings, PerfectionConfidence, PhaseBonus, RadicalitySettings, ReceptionTables,
    RetrogradeSettings, SolarConfidence, SolarSettings, SpeedBonus, TimingSettings,
    TranslationSettings, ViaCombusta, VoidExceptions, VoidRule,
};

/// Keys without a sensible default. Loading fails if any is absent.
pub const REQUIRED_KEYS: &[&str] = &[
    "timing.default_moon_speed_fallback",
    "orbs.conjunction",
    "moon.void_rule",
    "confidence.base_confidence",
    "confidence.lunar_confidence_caps.favorable",
    "confidence.lunar_confidence_caps.unfavorable",
    "radicality.asc_too_early",
    "radicality.asc_too_late",
];

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RootToml {
    #[serde(default)]
    timing: TimingToml,
    #[serde(default)]
    orbs: OrbsToml,
    #[serde(default)]
    moon: MoonToml,
    #[serde(default)]
    confidence: ConfidenceToml,
    #[serde(default)]
    dignity: DignityToml,
    #[serde(default)]
    retrograde: RetrogradeToml,
    #[serde(default)]
    radicality: RadicalityToml,
    #[serde(default)]
    solar: SolarToml,
    #[serde(default)]
    reception: ReceptionToml,
    #[serde(default)]
    locations: BTreeMap<String, LocationToml>,
}

#[derive(Debug, Default, Deserialize)]
struct TimingToml {
    default_moon_speed_fallback: Option<f64>,
    #[serde(default = "default_max_future_days")]
    max_future_days: f64,
    #[serde(default = "default_precision_days")]
    timing_precision_days: f64,
    #[serde(default = "default_stationary_threshold")]
    stationary_speed_threshold: f64,
}

fn default_max_future_days() -> f64 {
    365.0
}

fn default_precision_days() -> f64 {
    0.1
}

fn default_stationary_threshold() -> f64 {
    0.001
}

#[derive(Debug, Default, Deserialize)]
struct OrbsToml {
    conjunction: Option<f64>,
    #[serde(default = "default_sextile_orb")]
    sextile: f64,
    #[serde(default = "default_major_orb")]
    square: f64,
    #[serde(default = "default_major_orb")]
    trine: f64,
    #[serde(default = "default_major_orb")]
    opposition: f64,
    #[serde(default)]
    sun_orb_bonus: f64,
    #[serde(default)]
    moon_orb_bonus: f64,
    #[serde(default = "default_cazimi_arcmin")]
    cazimi_orb_arcmin: f64,
    #[serde(default = "default_combustion_orb")]
    combustion_orb: f64,
    #[serde(default = "default_under_beams_orb")]
    under_beams_orb: f64,
    #[serde(default = "default_void_orb")]
    void_orb_deg: f64,
    #[serde(default)]
    moieties: BTreeMap<String, f64>,
}

fn default_sextile_orb() -> f64 {
    6.0
}

fn default_major_orb() -> f64 {
    8.0
}

fn default_cazimi_arcmin() -> f64 {
    17.0
}

fn default_combustion_orb() -> f64 {
    8.5
}

fn default_under_beams_orb() -> f64 {
    15.0
}

fn default_void_orb() -> f64 {
    8.0
}

#[derive(Debug, Default, Deserialize)]
struct MoonToml {
    void_rule: Option<String>,
    #[serde(default)]
    void_exceptions: VoidExceptionsToml,
    #[serde(default = "default_void_penalty")]
    void_penalty: i32,
    #[serde(default)]
    void_gating: bool,
    #[serde(default)]
    translation: TranslationToml,
    #[serde(default)]
    phase_bonus: PhaseBonusToml,
    #[serde(default)]
    speed_bonus: SpeedBonusToml,
    #[serde(default)]
    angularity_bonus: AngularityBonusToml,
}

fn default_void_penalty() -> i32 {
    10
}

#[derive(Debug, Deserialize)]
struct VoidExceptionsToml {
    #[serde(default = "yes")]
    cancer: bool,
    #[serde(default = "yes")]
    sagittarius: bool,
    #[serde(default = "yes")]
    taurus: bool,
}

impl Default for VoidExceptionsToml {
    fn default() -> Self {
        Self {
            cancer: true,
            sagittarius: true,
            taurus: true,
        }
    }
}

fn yes() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct TranslationToml {
    #[serde(default = "yes")]
    require_speed_advantage: bool,
    #[serde(default = "yes")]
    require_proper_sequence: bool,
}

impl Default for TranslationToml {
    fn default() -> Self {
        Self {
            require_speed_advantage: true,
            require_proper_sequence: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PhaseBonusToml {
    new_moon: i32,
    waxing_crescent: i32,
    first_quarter: i32,
    waxing_gibbous: i32,
    full_moon: i32,
    waning_gibbous: i32,
    last_quarter: i32,
    waning_crescent: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SpeedBonusToml {
    very_slow: i32,
    slow: i32,
    average: i32,
    fast: i32,
    very_fast: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AngularityBonusToml {
    angular: i32,
    succedent: i32,
    cadent: i32,
}

#[derive(Debug, Default, Deserialize)]
struct ConfidenceToml {
    base_confidence: Option<i32>,
    #[serde(default)]
    lunar_confidence_caps: LunarCapsToml,
    #[serde(default)]
    perfection: PerfectionToml,
    #[serde(default)]
    reception: ReceptionConfidenceToml,
    #[serde(default)]
    solar: SolarConfidenceToml,
    #[serde(default)]
    denial: DenialToml,
}

#[derive(Debug, Default, Deserialize)]
struct LunarCapsToml {
    favorable: Option<i32>,
    unfavorable: Option<i32>,
    #[serde(default = "default_neutral_cap")]
    neutral: i32,
}

fn default_neutral_cap() -> i32 {
    70
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct PerfectionToml {
    direct_with_mutual_rulership: i32,
    direct_with_mutual_exaltation: i32,
    direct_basic: i32,
    translation_of_light: i32,
    collection_of_light: i32,
    reception_only: i32,
}

impl Default for PerfectionToml {
    fn default() -> Self {
        Self {
            direct_with_mutual_rulership: 95,
            direct_with_mutual_exaltation: 80,
            direct_basic: 85,
            translation_of_light: 80,
            collection_of_light: 75,
            reception_only: 55,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReceptionConfidenceToml {
    #[serde(default = "default_exaltation_bonus")]
    mutual_exaltation_bonus: f64,
}

impl Default for ReceptionConfidenceToml {
    fn default() -> Self {
        Self {
            mutual_exaltation_bonus: default_exaltation_bonus(),
        }
    }
}

fn default_exaltation_bonus() -> f64 {
    15.0
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SolarConfidenceToml {
    cazimi_bonus: i32,
    exact_cazimi_bonus: i32,
    combustion_penalty: i32,
    under_beams_penalty: i32,
}

impl Default for SolarConfidenceToml {
    fn default() -> Self {
        Self {
            cazimi_bonus: 6,
            exact_cazimi_bonus: 8,
            combustion_penalty: 6,
            under_beams_penalty: 5,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DenialToml {
    prohibition: i32,
    frustration_retrograde: i32,
    combustion: i32,
}

impl Default for DenialToml {
    fn default() -> Self {
        Self {
            prohibition: 80,
            frustration_retrograde: 80,
            combustion: 85,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DignityToml {
    rulership: i32,
    exaltation: i32,
    triplicity: i32,
    detriment: i32,
    fall: i32,
    joy: i32,
    angular: i32,
    succedent: i32,
    cadent: i32,
    speed_bonus: i32,
    speed_penalty: i32,
    hayz_bonus: i32,
    hayz_penalty: i32,
}

impl Default for DignityToml {
    fn default() -> Self {
        Self {
            rulership: 5,
            exaltation: 4,
            triplicity: 3,
            detriment: -5,
            fall: -4,
            joy: 2,
            angular: 4,
            succedent: 2,
            cadent: -2,
            speed_bonus: 2,
            speed_penalty: -2,
            hayz_bonus: 1,
            hayz_penalty: -1,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RetrogradeToml {
    automatic_denial: bool,
    dignity_penalty: i32,
    quesited_penalty: i32,
}

impl Default for RetrogradeToml {
    fn default() -> Self {
        Self {
            automatic_denial: false,
            dignity_penalty: -2,
            quesited_penalty: 12,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RadicalityToml {
    asc_too_early: Option<f64>,
    asc_too_late: Option<f64>,
    #[serde(default = "default_asc_penalty")]
    asc_warning_penalty: i32,
    #[serde(default)]
    gating: bool,
    #[serde(default = "yes")]
    saturn_7th_enabled: bool,
    #[serde(default = "yes")]
    via_combusta_enabled: bool,
    #[serde(default)]
    via_combusta: ViaCombustaToml,
    #[serde(default)]
    hour_agreement_enabled: bool,
    #[serde(default = "default_hour_mode")]
    hour_agreement_mode: String,
}

fn default_asc_penalty() -> i32 {
    15
}

fn default_hour_mode() -> String {
    "ruler".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ViaCombustaToml {
    libra_start: f64,
    scorpio_end: f64,
}

impl Default for ViaCombustaToml {
    fn default() -> Self {
        Self {
            libra_start: 15.0,
            scorpio_end: 15.0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SolarToml {
    severe_impediment_denial_enabled: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReceptionToml {
    terms: BTreeMap<String, Vec<DegreeSpanToml>>,
    faces: BTreeMap<String, Vec<DegreeSpanToml>>,
}

#[derive(Debug, Deserialize)]
struct DegreeSpanToml {
    start: f64,
    end: f64,
    ruler: String,
}

#[derive(Debug, Deserialize)]
struct LocationToml {
    #[serde(default)]
    name: Option<String>,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    utc_offset: Option<String>,
}

fn spans(table: BTreeMap<String, Vec<DegreeSpanToml>>) -> BTreeMap<String, Vec<DegreeSpan>> {
    table
        .into_iter()
        .map(|(sign, entries)| {
            let entries = entries
                .into_iter()
                .map(|e| DegreeSpan {
                    start: e.start,
                    end: e.end,
                    ruler: e.ruler.to_lowercase(),
                })
                .collect();
            (sign.to_lowercase(), entries)
        })
        .collect()
}

fn parse_void_rule(value: &str) -> VoidRule {
    match value.to_lowercase().as_str() {
        "by_sign" => VoidRule::BySign,
        "by_orb" => VoidRule::ByOrb,
        "lilly" => VoidRule::Lilly,
        other => {
            log::warn!("unknown moon.void_rule '{other}', using by_sign");
            VoidRule::BySign
        }
    }
}

fn parse_hour_mode(value: &str) -> HourAgreementMode {
    match value.to_lowercase().as_str() {
        "ruler" => HourAgreementMode::Ruler,
        "sign" => HourAgreementMode::Sign,
        "triplicity" => HourAgreementMode::Triplicity,
        other => {
            log::warn!("unsupported radicality.hour_agreement_mode '{other}'");
            HourAgreementMode::Unsupported
        }
    }
}

impl RootToml {
    fn missing_keys(&self) -> Vec<&'static str> {
        let present = [
            self.timing.default_moon_speed_fallback.is_some(),
            self.orbs.conjunction.is_some(),
            self.moon.void_rule.is_some(),
            self.confidence.base_confidence.is_some(),
            self.confidence.lunar_confidence_caps.favorable.is_some(),
            self.confidence.lunar_confidence_caps.unfavorable.is_some(),
            self.radicality.asc_too_early.is_some(),
            self.radicality.asc_too_late.is_some(),
        ];
        REQUIRED_KEYS
            .iter()
            .zip(present)
            .filter(|(_, ok)| !ok)
            .map(|(key, _)| *key)
            .collect()
    }

    pub(crate) fn into_settings(self) -> anyhow::Result<HorarySettings> {
        let missing = self.missing_keys();
        if !missing.is_empty() {
            anyhow::bail!(
                "Missing required configuration keys: {}",
                missing.join(", ")
            );
        }
        let RootToml {
            timing,
            orbs,
            moon,
            confidence,
            dignity,
            retrograde,
            radicality,
            solar,
            reception,
            locations,
        } = self;

        // Presence was checked above.
        let moon_fallback = timing.default_moon_speed_fallback.unwrap_or_default();
        let conjunction = orbs.conjunction.unwrap_or_default();
        let void_rule = parse_void_rule(moon.void_rule.as_deref().unwrap_or("by_sign"));
        let base_confidence = confidence.base_confidence.unwrap_or_default();
        let caps = &confidence.lunar_confidence_caps;

        Ok(HorarySettings {
            timing: TimingSettings {
                default_moon_speed_fallback: moon_fallback,
                max_future_days: timing.max_future_days,
                timing_precision_days: timing.timing_precision_days,
                stationary_speed_threshold: timing.stationary_speed_threshold,
            },
            orbs: OrbSettings {
                conjunction,
                sextile: orbs.sextile,
                square: orbs.square,
                trine: orbs.trine,
                opposition: orbs.opposition,
                sun_orb_bonus: orbs.sun_orb_bonus,
                moon_orb_bonus: orbs.moon_orb_bonus,
                cazimi_orb_arcmin: orbs.cazimi_orb_arcmin,
                combustion_orb: orbs.combustion_orb,
                under_beams_orb: orbs.under_beams_orb,
                void_orb_deg: orbs.void_orb_deg,
                moieties: orbs
                    .moieties
                    .into_iter()
                    .map(|(k, v)| (k.to_lowercase(), v))
                    .collect(),
            },
            moon: MoonSettings {
                void_rule,
                void_exceptions: VoidExceptions {
                    cancer: moon.void_exceptions.cancer,
                    sagittarius: moon.void_exceptions.sagittarius,
                    taurus: moon.void_exceptions.taurus,
                },
                void_penalty: moon.void_penalty,
                void_gating: moon.void_gating,
                translation: TranslationSettings {
                    require_speed_advantage: moon.translation.require_speed_advantage,
                    require_proper_sequence: moon.translation.require_proper_sequence,
                },
                phase_bonus: PhaseBonus {
                    new_moon: moon.phase_bonus.new_moon,
                    waxing_crescent: moon.phase_bonus.waxing_crescent,
                    first_quarter: moon.phase_bonus.first_quarter,
                    waxing_gibbous: moon.phase_bonus.waxing_gibbous,
                    full_moon: moon.phase_bonus.full_moon,
                    waning_gibbous: moon.phase_bonus.waning_gibbous,
                    last_quarter: moon.phase_bonus.last_quarter,
                    waning_crescent: moon.phase_bonus.waning_crescent,
                },
                speed_bonus: SpeedBonus {
                    very_slow: moon.speed_bonus.very_slow,
                    slow: moon.speed_bonus.slow,
                    average: moon.speed_bonus.average,
                    fast: moon.speed_bonus.fast,
                    very_fast: moon.speed_bonus.very_fast,
                },
                angularity_bonus: AngularityBonus {
                    angular: moon.angularity_bonus.angular,
                    succedent: moon.angularity_bonus.succedent,
                    cadent: moon.angularity_bonus.cadent,
                },
            },
            confidence: ConfidenceSettings {
                base_confidence,
                lunar_confidence_caps: LunarConfidenceCaps {
                    favorable: caps.favorable.unwrap_or_default(),
                    unfavorable: caps.unfavorable.unwrap_or_default(),
                    neutral: caps.neutral,
                },
                perfection: PerfectionConfidence {
                    direct_with_mutual_rulership: confidence.perfection.direct_with_mutual_rulership,
                    direct_with_mutual_exaltation: confidence
                        .perfection
                        .direct_with_mutual_exaltation,
                    direct_basic: confidence.perfection.direct_basic,
                    translation_of_light: confidence.perfection.translation_of_light,
                    collection_of_light: confidence.perfection.collection_of_light,
                    reception_only: confidence.perfection.reception_only,
                },
                mutual_exaltation_bonus: confidence.reception.mutual_exaltation_bonus,
                solar: SolarConfidence {
                    cazimi_bonus: confidence.solar.cazimi_bonus,
                    exact_cazimi_bonus: confidence.solar.exact_cazimi_bonus,
                    combustion_penalty: confidence.solar.combustion_penalty,
                    under_beams_penalty: confidence.solar.under_beams_penalty,
                },
                denial: DenialConfidence {
                    prohibition: confidence.denial.prohibition,
                    frustration_retrograde: confidence.denial.frustration_retrograde,
                    combustion: confidence.denial.combustion,
                },
            },
            dignity: DignitySettings {
                rulership: dignity.rulership,
                exaltation: dignity.exaltation,
                triplicity: dignity.triplicity,
                detriment: dignity.detriment,
                fall: dignity.fall,
                joy: dignity.joy,
                angular: dignity.angular,
                succedent: dignity.succedent,
                cadent: dignity.cadent,
                speed_bonus: dignity.speed_bonus,
                speed_penalty: dignity.speed_penalty,
                hayz_bonus: dignity.hayz_bonus,
                hayz_penalty: dignity.hayz_penalty,
            },
            retrograde: RetrogradeSettings {
                automatic_denial: retrograde.automatic_denial,
                dignity_penalty: retrograde.dignity_penalty,
                quesited_penalty: retrograde.quesited_penalty,
            },
            radicality: RadicalitySettings {
                asc_too_early: radicality.asc_too_early.unwrap_or_default(),
                asc_too_late: radicality.asc_too_late.unwrap_or_default(),
                asc_warning_penalty: radicality.asc_warning_penalty,
                gating: radicality.gating,
                saturn_7th_enabled: radicality.saturn_7th_enabled,
                via_combusta_enabled: radicality.via_combusta_enabled,
                via_combusta: ViaCombusta {
                    libra_start: radicality.via_combusta.libra_start,
                    scorpio_end: radicality.via_combusta.scorpio_end,
                },
                hour_agreement_enabled: radicality.hour_agreement_enabled,
                hour_agreement_mode: parse_hour_mode(&radicality.hour_agreement_mode),
            },
            solar: SolarSettings {
                severe_impediment_denial_enabled: solar.severe_impediment_denial_enabled,
            },
            reception: ReceptionTables {
                terms: spans(reception.terms),
                faces: spans(reception.faces),
            },
            locations: locations
                .into_iter()
                .map(|(key, loc)| {
                    let entry = LocationEntry {
                        name: loc.name.unwrap_or_else(|| key.clone()),
                        latitude: loc.latitude,
                        longitude: loc.longitude,
                        utc_offset: loc.utc_offset,
                    };
                    (key.to_lowercase(), entry)
                })
                .collect(),
        })
    }
}

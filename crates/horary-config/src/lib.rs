//! Typed, immutable settings for the horary engine.
//!
//! The TOML file is parsed once into private `*Toml` records, required keys
//! are checked eagerly, and the result is frozen into [`HorarySettings`],
//! which every engine component borrows.

mod raw;

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use raw::REQUIRED_KEYS;

/// Environment variable that points at an alternative config file.
pub const CONFIG_ENV_VAR: &str = "HORARY_CONFIG";

const BUNDLED_CONFIG: &str = include_str!("../../../configs/horary.toml");

#[derive(Debug, Clone)]
pub struct HorarySettings {
    pub timing: TimingSettings,
    pub orbs: OrbSettings,
    pub moon: MoonSettings,
    pub confidence: ConfidenceSettings,
    pub dignity: DignitySettings,
    pub retrograde: RetrogradeSettings,
    pub radicality: RadicalitySettings,
    pub solar: SolarSettings,
    pub reception: ReceptionTables,
    /// Named places keyed by lowercase name.
    pub locations: BTreeMap<String, LocationEntry>,
}

#[derive(Debug, Clone)]
pub struct TimingSettings {
    pub default_moon_speed_fallback: f64,
    pub max_future_days: f64,
    pub timing_precision_days: f64,
    pub stationary_speed_threshold: f64,
}

#[derive(Debug, Clone)]
pub struct OrbSettings {
    pub conjunction: f64,
    pub sextile: f64,
    pub square: f64,
    pub trine: f64,
    pub opposition: f64,
    pub sun_orb_bonus: f64,
    pub moon_orb_bonus: f64,
    pub cazimi_orb_arcmin: f64,
    pub combustion_orb: f64,
    pub under_beams_orb: f64,
    pub void_orb_deg: f64,
    /// Planet name (lowercase) -> moiety in degrees. Empty disables moiety orbs.
    pub moieties: BTreeMap<String, f64>,
}

impl OrbSettings {
    pub fn cazimi_orb_deg(&self) -> f64 {
        self.cazimi_orb_arcmin / 60.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoidRule {
    BySign,
    ByOrb,
    Lilly,
}

impl VoidRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoidRule::BySign => "by_sign",
            VoidRule::ByOrb => "by_orb",
            VoidRule::Lilly => "lilly",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VoidExceptions {
    pub cancer: bool,
    pub sagittarius: bool,
    pub taurus: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct TranslationSettings {
    pub require_speed_advantage: bool,
    pub require_proper_sequence: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct PhaseBonus {
    pub new_moon: i32,
    pub waxing_crescent: i32,
    pub first_quarter: i32,
    pub waxing_gibbous: i32,
    pub full_moon: i32,
    pub waning_gibbous: i32,
    pub last_quarter: i32,
    pub waning_crescent: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct SpeedBonus {
    pub very_slow: i32,
    pub slow: i32,
    pub average: i32,
    pub fast: i32,
    pub very_fast: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct AngularityBonus {
    pub angular: i32,
    pub succedent: i32,
    pub cadent: i32,
}

#[derive(Debug, Clone)]
pub struct MoonSettings {
    pub void_rule: VoidRule,
    pub void_exceptions: VoidExceptions,
    pub void_penalty: i32,
    pub void_gating: bool,
    pub translation: TranslationSettings,
    pub phase_bonus: PhaseBonus,
    pub speed_bonus: SpeedBonus,
    pub angularity_bonus: AngularityBonus,
}

#[derive(Debug, Clone, Copy)]
pub struct LunarConfidenceCaps {
    pub favorable: i32,
    pub unfavorable: i32,
    pub neutral: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct PerfectionConfidence {
    pub direct_with_mutual_rulership: i32,
    pub direct_with_mutual_exaltation: i32,
    pub direct_basic: i32,
    pub translation_of_light: i32,
    pub collection_of_light: i32,
    pub reception_only: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct SolarConfidence {
    pub cazimi_bonus: i32,
    pub exact_cazimi_bonus: i32,
    pub combustion_penalty: i32,
    pub under_beams_penalty: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct DenialConfidence {
    pub prohibition: i32,
    pub frustration_retrograde: i32,
    /// A significator burned by a conjunction with the Sun.
    pub combustion: i32,
}

#[derive(Debug, Clone)]
pub struct ConfidenceSettings {
    pub base_confidence: i32,
    pub lunar_confidence_caps: LunarConfidenceCaps,
    pub perfection: PerfectionConfidence,
    /// Added to mutual exaltation tiers unless a request overrides it.
    pub mutual_exaltation_bonus: f64,
    pub solar: SolarConfidence,
    pub denial: DenialConfidence,
}

#[derive(Debug, Clone, Copy)]
pub struct DignitySettings {
    pub rulership: i32,
    pub exaltation: i32,
    pub triplicity: i32,
    pub detriment: i32,
    pub fall: i32,
    pub joy: i32,
    pub angular: i32,
    pub succedent: i32,
    pub cadent: i32,
    pub speed_bonus: i32,
    pub speed_penalty: i32,
    pub hayz_bonus: i32,
    pub hayz_penalty: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct RetrogradeSettings {
    pub automatic_denial: bool,
    /// Added to the dignity score of a retrograde planet.
    pub dignity_penalty: i32,
    pub quesited_penalty: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourAgreementMode {
    Ruler,
    Sign,
    Triplicity,
    Unsupported,
}

#[derive(Debug, Clone, Copy)]
pub struct ViaCombusta {
    pub libra_start: f64,
    pub scorpio_end: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct RadicalitySettings {
    pub asc_too_early: f64,
    pub asc_too_late: f64,
    pub asc_warning_penalty: i32,
    pub gating: bool,
    pub saturn_7th_enabled: bool,
    pub via_combusta_enabled: bool,
    pub via_combusta: ViaCombusta,
    pub hour_agreement_enabled: bool,
    pub hour_agreement_mode: HourAgreementMode,
}

#[derive(Debug, Clone, Copy)]
pub struct SolarSettings {
    pub severe_impediment_denial_enabled: bool,
}

/// One bound of a term or face table: `[start, end)` degrees within a sign.
#[derive(Debug, Clone, PartialEq)]
pub struct DegreeSpan {
    pub start: f64,
    pub end: f64,
    pub ruler: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReceptionTables {
    /// Sign name (lowercase) -> term spans.
    pub terms: BTreeMap<String, Vec<DegreeSpan>>,
    /// Sign name (lowercase) -> face (decan) spans.
    pub faces: BTreeMap<String, Vec<DegreeSpan>>,
}

impl ReceptionTables {
    pub fn term_ruler(&self, sign: &str, degree: f64) -> Option<&str> {
        span_ruler(self.terms.get(sign)?, degree)
    }

    pub fn face_ruler(&self, sign: &str, degree: f64) -> Option<&str> {
        span_ruler(self.faces.get(sign)?, degree)
    }
}

fn span_ruler(spans: &[DegreeSpan], degree: f64) -> Option<&str> {
    spans
        .iter()
        .find(|s| degree >= s.start && degree < s.end)
        .map(|s| s.ruler.as_str())
}

#[derive(Debug, Clone)]
pub struct LocationEntry {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Fixed offset such as "+01:00"; derived from longitude when absent.
    pub utc_offset: Option<String>,
}

impl HorarySettings {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let root: raw::RootToml = toml::from_str(text)
            .map_err(|e| anyhow::anyhow!("Failed to parse horary configuration: {e}"))?;
        root.into_settings()
    }

    /// The configuration shipped in `configs/horary.toml`.
    pub fn bundled() -> anyhow::Result<Self> {
        Self::from_toml_str(BUNDLED_CONFIG)
    }

    pub fn moiety(&self, planet: &str) -> Option<f64> {
        self.orbs.moieties.get(&planet.to_lowercase()).copied()
    }
}

/// Same probing the daemon does for its layout: `HORARY_CONFIG` first, then
/// common relative paths for `configs/horary.toml`.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(p) = env::var(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(p));
    }
    let paths = ["configs/horary.toml", "../../configs/horary.toml"];
    paths.iter().map(PathBuf::from).find(|p| p.exists())
}

pub fn load_horary_settings_from(path: &Path) -> anyhow::Result<HorarySettings> {
    let text = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Could not read {}: {e}", path.display()))?;
    HorarySettings::from_toml_str(&text)
}

/// Load settings from disk, falling back to the bundled defaults when no
/// file can be found. A file that exists but is invalid is an error.
pub fn load_horary_settings() -> anyhow::Result<HorarySettings> {
    match resolve_config_path() {
        Some(path) => {
            log::info!("loading horary configuration from {}", path.display());
            load_horary_settings_from(&path)
        }
        None => {
            log::info!("no horary.toml found, using bundled configuration");
            HorarySettings::bundled()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_config_loads() {
        let settings = HorarySettings::bundled().unwrap();
        assert_eq!(settings.moon.void_rule, VoidRule::BySign);
        assert!(settings.radicality.asc_too_early < settings.radicality.asc_too_late);
        assert_eq!(settings.moiety("Sun"), Some(17.0));
        assert_eq!(settings.confidence.denial.combustion, 85);
        assert!((settings.orbs.cazimi_orb_deg() - 17.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_term_and_face_lookup() {
        let settings = HorarySettings::bundled().unwrap();
        assert_eq!(settings.reception.term_ruler("aries", 3.0), Some("jupiter"));
        assert_eq!(settings.reception.term_ruler("aries", 29.5), Some("saturn"));
        assert_eq!(settings.reception.face_ruler("aries", 5.0), Some("mars"));
        assert_eq!(settings.reception.face_ruler("pisces", 25.0), Some("mars"));
        assert_eq!(settings.reception.term_ruler("nowhere", 5.0), None);
    }

    #[test]
    fn test_missing_required_keys_are_listed() {
        let err = HorarySettings::from_toml_str("[orbs]\nsextile = 6.0\n").unwrap_err();
        let msg = err.to_string();
        for key in REQUIRED_KEYS {
            assert!(msg.contains(key), "missing {key} in: {msg}");
        }
    }

    #[test]
    fn test_unknown_void_rule_falls_back() {
        let text = BUNDLED_CONFIG.replace("void_rule = \"by_sign\"", "void_rule = \"bogus\"");
        let settings = HorarySettings::from_toml_str(&text).unwrap();
        assert_eq!(settings.moon.void_rule, VoidRule::BySign);
    }

    #[test]
    fn test_locations_are_lowercased() {
        let settings = HorarySettings::bundled().unwrap();
        let london = settings.locations.get("london, england").unwrap();
        assert!((london.latitude - 51.5074).abs() < 1e-6);
    }
}

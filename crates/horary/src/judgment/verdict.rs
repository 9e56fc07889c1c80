use super::solar_factors::SolarFactors;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "YES")]
    Yes,
    #[serde(rename = "NO")]
    No,
    #[serde(rename = "INCONCLUSIVE")]
    Inconclusive,
    #[serde(rename = "UNCLEAR")]
    Unclear,
    #[serde(rename = "CANNOT JUDGE")]
    CannotJudge,
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "LOCATION_ERROR")]
    LocationError,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Yes => "YES",
            Verdict::No => "NO",
            Verdict::Inconclusive => "INCONCLUSIVE",
            Verdict::Unclear => "UNCLEAR",
            Verdict::CannotJudge => "CANNOT JUDGE",
            Verdict::Error => "ERROR",
            Verdict::LocationError => "LOCATION_ERROR",
        }
    }

    pub fn from_favorable(favorable: bool) -> Self {
        if favorable {
            Verdict::Yes
        } else {
            Verdict::No
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The factors a verdict rested on. Only the keys a branch sets are
/// serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TraditionalFactors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perfection_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reception: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub querent_strength: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quesited_strength: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prohibiting_planet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impediment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moon_void: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moon_benefic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefic_noted: Option<bool>,
    /// Per-item strengths such as `car_strength`.
    #[serde(flatten)]
    pub extra: BTreeMap<String, i32>,
}

impl TraditionalFactors {
    pub fn of_kind(kind: &str) -> Self {
        Self {
            perfection_type: Some(kind.to_string()),
            ..Self::default()
        }
    }

    pub fn with_strengths(mut self, querent: i32, quesited: i32) -> Self {
        self.querent_strength = Some(querent);
        self.quesited_strength = Some(quesited);
        self
    }

    pub fn with_reception(mut self, reception: impl Into<String>) -> Self {
        self.reception = Some(reception.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// What the rule pipeline concluded, before the chart is attached.
#[derive(Debug, Clone, Serialize)]
pub struct Judgment {
    pub verdict: Verdict,
    pub confidence: i32,
    pub reasoning: Vec<String>,
    pub timing: Option<String>,
    pub traditional_factors: TraditionalFactors,
    pub solar_factors: Option<SolarFactors>,
}

impl Judgment {
    pub fn new(verdict: Verdict, confidence: i32, reasoning: Vec<String>) -> Self {
        Self {
            verdict,
            confidence: confidence.clamp(0, 100),
            reasoning,
            timing: None,
            traditional_factors: TraditionalFactors::default(),
            solar_factors: None,
        }
    }

    pub fn with_timing(mut self, timing: impl Into<String>) -> Self {
        self.timing = Some(timing.into());
        self
    }

    pub fn with_factors(mut self, factors: TraditionalFactors) -> Self {
        self.traditional_factors = factors;
        self
    }

    pub fn with_solar(mut self, solar: Option<SolarFactors>) -> Self {
        self.solar_factors = solar;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_wire_names() {
        assert_eq!(serde_json::to_string(&Verdict::CannotJudge).unwrap(), "\"CANNOT JUDGE\"");
        assert_eq!(serde_json::to_string(&Verdict::LocationError).unwrap(), "\"LOCATION_ERROR\"");
        assert_eq!(Verdict::from_favorable(false), Verdict::No);
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(Judgment::new(Verdict::Yes, 130, vec![]).confidence, 100);
        assert_eq!(Judgment::new(Verdict::No, -5, vec![]).confidence, 0);
    }

    #[test]
    fn test_factors_skip_unset_keys() {
        let mut factors = TraditionalFactors::of_kind("direct").with_strengths(3, -2);
        factors.extra.insert("car_strength".to_string(), 4);
        let json = serde_json::to_value(&factors).unwrap();
        assert_eq!(json["perfection_type"], "direct");
        assert_eq!(json["car_strength"], 4);
        assert!(json.get("prohibiting_planet").is_none());
    }
}

use crate::western::types::Planet;
use chrono::{DateTime, Utc};
use horary_config::OrbSettings;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five Ptolemaic aspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aspect {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

impl Aspect {
    pub const ALL: [Aspect; 5] = [
        Aspect::Conjunction,
        Aspect::Sextile,
        Aspect::Square,
        Aspect::Trine,
        Aspect::Opposition,
    ];

    pub fn degrees(&self) -> f64 {
        match self {
            Aspect::Conjunction => 0.0,
            Aspect::Sextile => 60.0,
            Aspect::Square => 90.0,
            Aspect::Trine => 120.0,
            Aspect::Opposition => 180.0,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Aspect::Conjunction => "Conjunction",
            Aspect::Sextile => "Sextile",
            Aspect::Square => "Square",
            Aspect::Trine => "Trine",
            Aspect::Opposition => "Opposition",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Aspect::Conjunction => "☌",
            Aspect::Sextile => "⚹",
            Aspect::Square => "□",
            Aspect::Trine => "△",
            Aspect::Opposition => "☍",
        }
    }

    /// Configured flat orb, used when moieties are not available.
    pub fn base_orb(&self, orbs: &OrbSettings) -> f64 {
        match self {
            Aspect::Conjunction => orbs.conjunction,
            Aspect::Sextile => orbs.sextile,
            Aspect::Square => orbs.square,
            Aspect::Trine => orbs.trine,
            Aspect::Opposition => orbs.opposition,
        }
    }

    /// Conjunction, sextile and trine.
    pub fn is_favorable(&self) -> bool {
        matches!(self, Aspect::Conjunction | Aspect::Sextile | Aspect::Trine)
    }

    pub fn is_hard(&self) -> bool {
        matches!(self, Aspect::Square | Aspect::Opposition)
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// An aspect detected between two planets of one chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AspectInfo {
    pub planet1: Planet,
    pub planet2: Planet,
    pub aspect: Aspect,
    /// Distance from exact, in degrees
    pub orb: f64,
    pub applying: bool,
    /// Projected moment of perfection, when within the timing horizon
    pub exact_time: Option<DateTime<Utc>>,
    pub degrees_to_exact: f64,
}

impl AspectInfo {
    pub fn involves(&self, planet: Planet) -> bool {
        self.planet1 == planet || self.planet2 == planet
    }

    pub fn joins(&self, a: Planet, b: Planet) -> bool {
        (self.planet1 == a && self.planet2 == b) || (self.planet1 == b && self.planet2 == a)
    }

    /// The partner of `planet` in this aspect.
    pub fn other(&self, planet: Planet) -> Option<Planet> {
        if self.planet1 == planet {
            Some(self.planet2)
        } else if self.planet2 == planet {
            Some(self.planet1)
        } else {
            None
        }
    }

    /// "Venus △ Saturn (applying)"
    pub fn display(&self) -> String {
        format_aspect(self.planet1, self.aspect, self.planet2, self.applying)
    }
}

pub fn format_aspect(planet1: Planet, aspect: Aspect, planet2: Planet, applying: bool) -> String {
    let status = if applying { "applying" } else { "separating" };
    format!("{planet1} {} {planet2} ({status})", aspect.symbol())
}

/// The Moon's most relevant past or future aspect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LunarAspect {
    pub planet: Planet,
    pub aspect: Aspect,
    pub orb: f64,
    pub degrees_difference: f64,
    pub perfection_eta_days: f64,
    pub perfection_eta_description: String,
    pub applying: bool,
}

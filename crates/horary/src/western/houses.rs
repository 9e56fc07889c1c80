//! House placement and angularity over a set of twelve cusps.

use crate::western::types::{angular_distance, normalize_degrees};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Angularity {
    Angular,
    Succedent,
    Cadent,
}

impl Angularity {
    /// Classification by house number alone.
    pub fn of_house(house: u8) -> Angularity {
        match house {
            1 | 4 | 7 | 10 => Angularity::Angular,
            2 | 5 | 8 | 11 => Angularity::Succedent,
            _ => Angularity::Cadent,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Angularity::Angular => "angular",
            Angularity::Succedent => "succedent",
            Angularity::Cadent => "cadent",
        }
    }
}

pub fn is_cadent(house: u8) -> bool {
    Angularity::of_house(house) == Angularity::Cadent
}

/// House (1-12) containing `longitude`. Spans that cross 0 Aries wrap; a
/// degenerate cusp set falls back to the first house.
pub fn house_position(longitude: f64, cusps: &[f64; 12]) -> u8 {
    let lon = normalize_degrees(longitude);
    for i in 0..12 {
        let current = normalize_degrees(cusps[i]);
        let next = normalize_degrees(cusps[(i + 1) % 12]);
        let inside = if current > next {
            lon >= current || lon < next
        } else {
            lon >= current && lon < next
        };
        if inside {
            return (i + 1) as u8;
        }
    }
    1
}

/// Angularity with the five degree rule: a body within 5 degrees of the
/// 1st, 4th, 7th or 10th cusp counts as angular whatever its house.
pub fn traditional_angularity(longitude: f64, cusps: &[f64; 12], house: u8) -> Angularity {
    let near_angle = [cusps[0], cusps[3], cusps[6], cusps[9]]
        .iter()
        .any(|cusp| angular_distance(longitude, *cusp) <= 5.0);
    if near_angle {
        Angularity::Angular
    } else {
        Angularity::of_house(house)
    }
}

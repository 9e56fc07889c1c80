//! Reception between two planets by essential dignity.
//!
//! This is the only place reception is decided. Everything that needs to
//! know whether one planet receives another goes through
//! [`ReceptionCalculator`].

use crate::chart::HoraryChart;
use crate::western::rulers::{exaltation_sign, sign_ruler, triplicity_ruler};
use crate::western::types::{degree_in_sign, Planet, Sign};
use horary_config::ReceptionTables;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DignityTag {
    Domicile,
    Exaltation,
    Triplicity,
    Term,
    Face,
}

impl DignityTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            DignityTag::Domicile => "domicile",
            DignityTag::Exaltation => "exaltation",
            DignityTag::Triplicity => "triplicity",
            DignityTag::Term => "term",
            DignityTag::Face => "face",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceptionKind {
    None,
    MutualRulership,
    MutualExaltation,
    MutualTerm,
    MutualFace,
    MixedReception,
    Unilateral,
}

impl ReceptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceptionKind::None => "none",
            ReceptionKind::MutualRulership => "mutual_rulership",
            ReceptionKind::MutualExaltation => "mutual_exaltation",
            ReceptionKind::MutualTerm => "mutual_term",
            ReceptionKind::MutualFace => "mutual_face",
            ReceptionKind::MixedReception => "mixed_reception",
            ReceptionKind::Unilateral => "unilateral",
        }
    }

    /// Receptions strong enough to overcome a hard aspect.
    pub fn overcomes_hard_aspect(&self) -> bool {
        matches!(
            self,
            ReceptionKind::MutualRulership
                | ReceptionKind::MutualExaltation
                | ReceptionKind::MixedReception
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceptionResult {
    #[serde(rename = "type")]
    pub kind: ReceptionKind,
    pub planet1: Planet,
    pub planet2: Planet,
    pub planet1_receives_planet2: Vec<DignityTag>,
    pub planet2_receives_planet1: Vec<DignityTag>,
    pub day_chart: bool,
    pub display_text: String,
    pub strength: u8,
}

impl ReceptionResult {
    /// Dignities of the unilateral side, or empty for mutual kinds.
    fn unilateral_tags(&self) -> &[DignityTag] {
        if self.planet1_receives_planet2.is_empty() {
            &self.planet2_receives_planet1
        } else {
            &self.planet1_receives_planet2
        }
    }
}

/// Where a received planet sits: enough to look up every dignity tier.
#[derive(Debug, Clone, Copy)]
pub struct ReceivedAt {
    pub planet: Planet,
    pub longitude: f64,
}

pub struct ReceptionCalculator<'a> {
    tables: &'a ReceptionTables,
}

impl<'a> ReceptionCalculator<'a> {
    pub fn new(tables: &'a ReceptionTables) -> Self {
        Self { tables }
    }

    pub fn compute(&self, chart: &HoraryChart, planet1: Planet, planet2: Planet) -> ReceptionResult {
        let a = ReceivedAt {
            planet: planet1,
            longitude: chart.planet(planet1).longitude,
        };
        let b = ReceivedAt {
            planet: planet2,
            longitude: chart.planet(planet2).longitude,
        };
        self.compute_between(a, b, chart.is_day())
    }

    /// Does `receiving` hold any dignity where `received` stands?
    pub fn receives(&self, chart: &HoraryChart, receiving: Planet, received: Planet) -> bool {
        !self
            .dignities_over(receiving, chart.planet(received).longitude, chart.is_day())
            .is_empty()
    }

    pub fn compute_between(&self, a: ReceivedAt, b: ReceivedAt, is_day: bool) -> ReceptionResult {
        let one_to_two = self.dignities_over(a.planet, b.longitude, is_day);
        let two_to_one = self.dignities_over(b.planet, a.longitude, is_day);
        let kind = classify(&one_to_two, &two_to_one);

        let mut result = ReceptionResult {
            kind,
            planet1: a.planet,
            planet2: b.planet,
            planet1_receives_planet2: one_to_two,
            planet2_receives_planet1: two_to_one,
            day_chart: is_day,
            display_text: String::new(),
            strength: 0,
        };
        result.strength = strength(&result);
        result.display_text = display(&result);
        result
    }

    /// Dignity tags `receiving` holds at `longitude`, strongest first.
    pub fn dignities_over(&self, receiving: Planet, longitude: f64, is_day: bool) -> Vec<DignityTag> {
        let sign = Sign::from_longitude(longitude);
        let degree = degree_in_sign(longitude);
        let mut tags = Vec::new();

        if sign_ruler(sign) == receiving {
            tags.push(DignityTag::Domicile);
        }
        if exaltation_sign(receiving) == sign {
            tags.push(DignityTag::Exaltation);
        }
        if triplicity_ruler(sign.element(), is_day) == receiving {
            tags.push(DignityTag::Triplicity);
        }
        let id = sign.id();
        if self.table_ruler_is(self.tables.term_ruler(&id, degree), receiving) {
            tags.push(DignityTag::Term);
        }
        if self.table_ruler_is(self.tables.face_ruler(&id, degree), receiving) {
            tags.push(DignityTag::Face);
        }
        tags
    }

    fn table_ruler_is(&self, ruler: Option<&str>, planet: Planet) -> bool {
        ruler.and_then(Planet::from_name) == Some(planet)
    }
}

fn classify(one_to_two: &[DignityTag], two_to_one: &[DignityTag]) -> ReceptionKind {
    let both = |tag: DignityTag| one_to_two.contains(&tag) && two_to_one.contains(&tag);

    if one_to_two.is_empty() && two_to_one.is_empty() {
        ReceptionKind::None
    } else if both(DignityTag::Domicile) {
        ReceptionKind::MutualRulership
    } else if both(DignityTag::Exaltation) {
        ReceptionKind::MutualExaltation
    } else if both(DignityTag::Term) {
        ReceptionKind::MutualTerm
    } else if both(DignityTag::Face) {
        ReceptionKind::MutualFace
    } else if !one_to_two.is_empty() && !two_to_one.is_empty() {
        ReceptionKind::MixedReception
    } else {
        ReceptionKind::Unilateral
    }
}

fn strength(result: &ReceptionResult) -> u8 {
    match result.kind {
        ReceptionKind::None => 0,
        ReceptionKind::MutualRulership => 10,
        ReceptionKind::MutualExaltation => 8,
        ReceptionKind::MixedReception => 6,
        ReceptionKind::MutualTerm => 5,
        ReceptionKind::MutualFace => 4,
        ReceptionKind::Unilateral => {
            let tags = result.unilateral_tags();
            if tags.contains(&DignityTag::Domicile) {
                5
            } else if tags.contains(&DignityTag::Exaltation) {
                4
            } else if tags.contains(&DignityTag::Triplicity) {
                3
            } else if tags.contains(&DignityTag::Term) {
                2
            } else {
                1
            }
        }
    }
}

fn join_tags(tags: &[DignityTag]) -> String {
    tags.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(", ")
}

fn display(result: &ReceptionResult) -> String {
    let (p1, p2) = (result.planet1, result.planet2);
    match result.kind {
        ReceptionKind::None => "no reception".to_string(),
        ReceptionKind::MutualRulership => format!("{p1}↔{p2} mutual domicile reception"),
        ReceptionKind::MutualExaltation => format!("{p1}↔{p2} mutual exaltation reception"),
        ReceptionKind::MutualTerm => format!("{p1}↔{p2} mutual term reception"),
        ReceptionKind::MutualFace => format!("{p1}↔{p2} mutual face reception"),
        ReceptionKind::MixedReception => format!(
            "{p1}↔{p2} mixed reception ({} / {})",
            join_tags(&result.planet1_receives_planet2),
            join_tags(&result.planet2_receives_planet1)
        ),
        ReceptionKind::Unilateral => {
            let (receiving, received) = if result.planet1_receives_planet2.is_empty() {
                (p2, p1)
            } else {
                (p1, p2)
            };
            format!(
                "{receiving} receives {received} by {}",
                join_tags(result.unilateral_tags())
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horary_config::HorarySettings;

    fn at(planet: Planet, longitude: f64) -> ReceivedAt {
        ReceivedAt { planet, longitude }
    }

    #[test]
    fn test_mutual_rulership() {
        let settings = HorarySettings::bundled().unwrap();
        let calc = ReceptionCalculator::new(&settings.reception);
        // Venus in Capricorn, Saturn in Taurus
        let r = calc.compute_between(at(Planet::Venus, 285.0), at(Planet::Saturn, 45.0), true);
        assert_eq!(r.kind, ReceptionKind::MutualRulership);
        assert_eq!(r.strength, 10);
        assert!(r.display_text.contains("mutual domicile"));
    }

    #[test]
    fn test_mutual_exaltation() {
        let settings = HorarySettings::bundled().unwrap();
        let calc = ReceptionCalculator::new(&settings.reception);
        // Sun in Libra (Saturn's exaltation), Saturn in Aries (Sun's exaltation)
        let r = calc.compute_between(at(Planet::Sun, 200.0), at(Planet::Saturn, 20.0), false);
        assert_eq!(r.kind, ReceptionKind::MutualExaltation);
        assert_eq!(r.strength, 8);
    }

    #[test]
    fn test_reception_kind_is_symmetric() {
        let settings = HorarySettings::bundled().unwrap();
        let calc = ReceptionCalculator::new(&settings.reception);
        for (a, b) in [(10.0, 100.0), (285.0, 45.0), (130.0, 250.0), (33.0, 333.0)] {
            for is_day in [true, false] {
                let ab = calc.compute_between(at(Planet::Mars, a), at(Planet::Moon, b), is_day);
                let ba = calc.compute_between(at(Planet::Moon, b), at(Planet::Mars, a), is_day);
                assert_eq!(ab.kind, ba.kind);
            }
        }
    }

    #[test]
    fn test_unilateral_display() {
        let settings = HorarySettings::bundled().unwrap();
        let calc = ReceptionCalculator::new(&settings.reception);
        // Moon at 15 Aries: Mars receives by domicile. Mars at 15 Leo: Moon has nothing.
        let r = calc.compute_between(at(Planet::Moon, 15.0), at(Planet::Mars, 135.0), false);
        assert_eq!(r.kind, ReceptionKind::Unilateral);
        assert!(r.display_text.starts_with("Mars receives Moon by domicile"));
        assert_eq!(r.strength, 5);
    }

    #[test]
    fn test_missing_tables_degrade() {
        let tables = ReceptionTables::default();
        let calc = ReceptionCalculator::new(&tables);
        let tags = calc.dignities_over(Planet::Jupiter, 3.0, true);
        assert!(!tags.contains(&DignityTag::Term));
    }
}

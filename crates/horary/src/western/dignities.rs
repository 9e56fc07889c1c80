//! Dignity scoring for horary charts.
//!
//! The score is an additive composition of essential dignity (rulership,
//! exaltation, triplicity, detriment, fall) and accidental dignity (joy,
//! angularity, speed, retrogradation, hayz, solar condition). Point values
//! come from the `[dignity]` configuration section.

use crate::solar::{SolarAnalysis, SolarCondition};
use crate::western::houses::{traditional_angularity, Angularity};
use crate::western::rulers::{
    exaltation_sign, fall_sign, is_in_detriment, joy_house, sign_ruler, triplicity_ruler,
};
use crate::western::types::{Planet, Sign};
use horary_config::HorarySettings;

/// Everything the scorer needs to know about one placed planet.
#[derive(Debug, Clone, Copy)]
pub struct PlacedPlanet {
    pub planet: Planet,
    pub longitude: f64,
    pub sign: Sign,
    pub house: u8,
    pub speed: f64,
}

pub struct DignityScorer<'a> {
    settings: &'a HorarySettings,
}

impl<'a> DignityScorer<'a> {
    pub fn new(settings: &'a HorarySettings) -> Self {
        Self { settings }
    }

    pub fn score(
        &self,
        placed: &PlacedPlanet,
        cusps: &[f64; 12],
        is_day: bool,
        solar: Option<&SolarAnalysis>,
    ) -> i32 {
        self.essential(placed.planet, placed.sign, is_day)
            + self.accidental(placed, cusps, is_day)
            + self.solar_modifier(solar)
    }

    /// Essential dignity of a planet in a sign.
    pub fn essential(&self, planet: Planet, sign: Sign, is_day: bool) -> i32 {
        let d = &self.settings.dignity;
        let mut score = 0;
        if sign_ruler(sign) == planet {
            score += d.rulership;
        }
        if exaltation_sign(planet) == sign {
            score += d.exaltation;
        }
        if triplicity_ruler(sign.element(), is_day) == planet {
            score += d.triplicity;
        }
        if is_in_detriment(planet, sign) {
            score += d.detriment;
        }
        if fall_sign(planet) == sign {
            score += d.fall;
        }
        score
    }

    fn accidental(&self, placed: &PlacedPlanet, cusps: &[f64; 12], is_day: bool) -> i32 {
        let d = &self.settings.dignity;
        let mut score = 0;

        if joy_house(placed.planet) == placed.house {
            score += d.joy;
        }

        score += match traditional_angularity(placed.longitude, cusps, placed.house) {
            Angularity::Angular => d.angular,
            Angularity::Succedent => d.succedent,
            Angularity::Cadent => d.cadent,
        };

        score += self.speed_modifier(placed.planet, placed.speed);

        if placed.speed < 0.0 {
            score += self.settings.retrograde.dignity_penalty;
        }

        score + self.hayz_modifier(placed.planet, is_day)
    }

    fn speed_modifier(&self, planet: Planet, speed: f64) -> i32 {
        let d = &self.settings.dignity;
        match planet {
            Planet::Moon if speed > 13.0 => d.speed_bonus,
            Planet::Moon if speed < 11.0 => d.speed_penalty,
            Planet::Mercury | Planet::Venus if speed > 1.0 => d.speed_bonus,
            Planet::Mars | Planet::Jupiter | Planet::Saturn if speed > 0.3 => d.speed_bonus,
            Planet::Mars | Planet::Jupiter | Planet::Saturn if speed < 0.1 => d.speed_penalty,
            _ => 0,
        }
    }

    fn hayz_modifier(&self, planet: Planet, is_day: bool) -> i32 {
        let d = &self.settings.dignity;
        let diurnal = matches!(planet, Planet::Sun | Planet::Jupiter | Planet::Saturn);
        let nocturnal = matches!(planet, Planet::Moon | Planet::Venus | Planet::Mars);
        if (diurnal && is_day) || (nocturnal && !is_day) {
            d.hayz_bonus
        } else if diurnal || nocturnal {
            d.hayz_penalty
        } else {
            0
        }
    }

    fn solar_modifier(&self, solar: Option<&SolarAnalysis>) -> i32 {
        let s = &self.settings.confidence.solar;
        match solar {
            Some(a) => match a.condition {
                SolarCondition::Cazimi if a.exact_cazimi => s.exact_cazimi_bonus,
                SolarCondition::Cazimi => s.cazimi_bonus,
                SolarCondition::Combustion if !a.traditional_exception => -s.combustion_penalty,
                SolarCondition::UnderBeams if !a.traditional_exception => -s.under_beams_penalty,
                _ => 0,
            },
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cusps() -> [f64; 12] {
        let mut c = [0.0; 12];
        for (i, v) in c.iter_mut().enumerate() {
            *v = i as f64 * 30.0;
        }
        c
    }

    #[test]
    fn test_essential_dignity() {
        let settings = HorarySettings::bundled().unwrap();
        let scorer = DignityScorer::new(&settings);
        // Venus in Pisces by night: exaltation only
        assert_eq!(scorer.essential(Planet::Venus, Sign::Pisces, false), 4);
        // Venus in Pisces by day: exaltation and water triplicity
        assert_eq!(scorer.essential(Planet::Venus, Sign::Pisces, true), 7);
        // Saturn in Aries: fall
        assert_eq!(scorer.essential(Planet::Saturn, Sign::Aries, true), -4);
        // Mars in Libra: detriment
        assert_eq!(scorer.essential(Planet::Mars, Sign::Libra, true), -5);
    }

    #[test]
    fn test_full_score_sums_factors() {
        let settings = HorarySettings::bundled().unwrap();
        let scorer = DignityScorer::new(&settings);
        // Jupiter at 15 Sagittarius, 9th house, fast, day chart.
        let placed = PlacedPlanet {
            planet: Planet::Jupiter,
            longitude: 255.0,
            sign: Sign::Sagittarius,
            house: 9,
            speed: 0.2,
        };
        // rulership 5 + cadent -2 + hayz 1
        assert_eq!(scorer.score(&placed, &cusps(), true, None), 4);
    }

    #[test]
    fn test_retrograde_and_combust() {
        let settings = HorarySettings::bundled().unwrap();
        let scorer = DignityScorer::new(&settings);
        let placed = PlacedPlanet {
            planet: Planet::Mercury,
            longitude: 195.0,
            sign: Sign::Libra,
            house: 7,
            speed: -0.5,
        };
        let solar = SolarAnalysis {
            planet: Planet::Mercury,
            distance_from_sun: 4.0,
            condition: SolarCondition::Combustion,
            exact_cazimi: false,
            traditional_exception: false,
        };
        // night air triplicity 3, angular 4, retrograde -2, combust -6
        assert_eq!(scorer.score(&placed, &cusps(), false, Some(&solar)), -1);
    }
}

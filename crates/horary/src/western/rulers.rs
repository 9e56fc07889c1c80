//! Essential dignity tables for the traditional planets.
//!
//! Domicile, exaltation, detriment, fall, house joys and the sect-dependent
//! triplicity rulers. Both dignity scoring and reception read from here.

use crate::western::types::{Element, Planet, Sign};

/// Domicile ruler of a sign.
pub fn sign_ruler(sign: Sign) -> Planet {
    const RULERS: [Planet; 12] = [
        Planet::Mars,    // Aries
        Planet::Venus,   // Taurus
        Planet::Mercury, // Gemini
        Planet::Moon,    // Cancer
        Planet::Sun,     // Leo
        Planet::Mercury, // Virgo
        Planet::Venus,   // Libra
        Planet::Mars,    // Scorpio
        Planet::Jupiter, // Sagittarius
        Planet::Saturn,  // Capricorn
        Planet::Saturn,  // Aquarius
        Planet::Jupiter, // Pisces
    ];
    RULERS[sign.index()]
}

pub fn exaltation_sign(planet: Planet) -> Sign {
    match planet {
        Planet::Sun => Sign::Aries,
        Planet::Moon => Sign::Taurus,
        Planet::Mercury => Sign::Virgo,
        Planet::Venus => Sign::Pisces,
        Planet::Mars => Sign::Capricorn,
        Planet::Jupiter => Sign::Cancer,
        Planet::Saturn => Sign::Libra,
    }
}

pub fn fall_sign(planet: Planet) -> Sign {
    match planet {
        Planet::Sun => Sign::Libra,
        Planet::Moon => Sign::Scorpio,
        Planet::Mercury => Sign::Pisces,
        Planet::Venus => Sign::Virgo,
        Planet::Mars => Sign::Cancer,
        Planet::Jupiter => Sign::Capricorn,
        Planet::Saturn => Sign::Aries,
    }
}

pub fn detriment_signs(planet: Planet) -> &'static [Sign] {
    match planet {
        Planet::Sun => &[Sign::Aquarius],
        Planet::Moon => &[Sign::Capricorn],
        Planet::Mercury => &[Sign::Pisces, Sign::Sagittarius],
        Planet::Venus => &[Sign::Aries, Sign::Scorpio],
        Planet::Mars => &[Sign::Libra, Sign::Taurus],
        Planet::Jupiter => &[Sign::Gemini, Sign::Virgo],
        Planet::Saturn => &[Sign::Cancer, Sign::Leo],
    }
}

pub fn is_in_detriment(planet: Planet, sign: Sign) -> bool {
    detriment_signs(planet).contains(&sign)
}

/// House in which the planet rejoices.
pub fn joy_house(planet: Planet) -> u8 {
    match planet {
        Planet::Mercury => 1,
        Planet::Moon => 3,
        Planet::Venus => 5,
        Planet::Mars => 6,
        Planet::Sun => 9,
        Planet::Jupiter => 11,
        Planet::Saturn => 12,
    }
}

/// Triplicity ruler by element and sect.
pub fn triplicity_ruler(element: Element, is_day: bool) -> Planet {
    match (element, is_day) {
        (Element::Fire, true) => Planet::Sun,
        (Element::Fire, false) => Planet::Jupiter,
        (Element::Earth, true) => Planet::Venus,
        (Element::Earth, false) => Planet::Moon,
        (Element::Air, true) => Planet::Saturn,
        (Element::Air, false) => Planet::Mercury,
        (Element::Water, true) => Planet::Venus,
        (Element::Water, false) => Planet::Mars,
    }
}

/// A chart is diurnal when the Sun sits in houses 7 to 12.
pub fn is_day_chart(sun_house: u8) -> bool {
    (7..=12).contains(&sun_house)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_rulers() {
        assert_eq!(sign_ruler(Sign::Aries), Planet::Mars);
        assert_eq!(sign_ruler(Sign::Cancer), Planet::Moon);
        assert_eq!(sign_ruler(Sign::Aquarius), Planet::Saturn);
        assert_eq!(sign_ruler(Sign::Pisces), Planet::Jupiter);
    }

    #[test]
    fn test_detriment_is_opposite_domicile() {
        for sign in Sign::ALL {
            let ruler = sign_ruler(sign);
            let opposite = Sign::from_index(sign.index() + 6);
            assert!(is_in_detriment(ruler, opposite), "{ruler} in {opposite}");
        }
    }

    #[test]
    fn test_water_triplicity() {
        assert_eq!(triplicity_ruler(Element::Water, true), Planet::Venus);
        assert_eq!(triplicity_ruler(Element::Water, false), Planet::Mars);
    }

    #[test]
    fn test_day_chart() {
        assert!(is_day_chart(10));
        assert!(!is_day_chart(4));
    }
}

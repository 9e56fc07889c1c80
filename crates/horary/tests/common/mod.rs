#![allow(dead_code)]

use chrono::{FixedOffset, TimeZone, Utc};
use horary::chart::{ChartBuilder, ChartMoment, HoraryChart, PositionsOnly, SkyContext, StationTable};
use horary::ephemeris::{
    datetime_to_julian_day, BodyPosition, Ephemeris, EphemerisError, GeoLocation, HouseFrame,
};
use horary::western::types::{normalize_degrees, Planet};
use horary_config::HorarySettings;

pub const LONDON: GeoLocation = GeoLocation {
    lat: 51.5074,
    lon: -0.1278,
};

pub fn settings() -> HorarySettings {
    HorarySettings::bundled().expect("bundled configuration parses")
}

/// Noon UTC, 10 May 2024.
pub fn moment() -> ChartMoment {
    let utc = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
    ChartMoment {
        local: utc.with_timezone(&FixedOffset::east_opt(0).unwrap()),
        utc,
        timezone_info: "UTC".to_string(),
        julian_day: datetime_to_julian_day(utc),
    }
}

/// `(longitude, daily speed)` for Sun, Moon, Mercury, Venus, Mars, Jupiter, Saturn.
pub type Layout = [(f64, f64); 7];

pub fn bodies(layout: &Layout) -> [BodyPosition; 7] {
    layout.map(|(lon, speed)| BodyPosition::new(lon, speed))
}

/// Equal houses from `ascendant`, daytime Sun altitude, no stations.
pub fn chart(settings: &HorarySettings, layout: &Layout, ascendant: f64) -> HoraryChart {
    let builder = ChartBuilder::new(settings);
    let positions = PositionsOnly {
        bodies: bodies(layout),
        frame: HouseFrame::equal(ascendant),
    };
    let sky = SkyContext {
        sun_altitude: 30.0,
        moon_speed: builder.moon_speed(&positions),
        stations: StationTable::new(),
        planetary_hour: None,
    };
    builder.assemble(positions, moment(), LONDON, "London", sky)
}

/// Mars in Aquarius applying by sextile to Saturn in Aries: mutual
/// reception by domicile. Ascendant 10 Aries, so Mars rules the 1st and
/// Saturn the 10th.
pub const MUTUAL_RULERSHIP: Layout = [
    (345.0, 0.98), // Sun
    (105.0, 13.0), // Moon
    (355.0, 1.2),  // Mercury
    (50.0, 1.1),   // Venus
    (310.0, 0.7),  // Mars
    (160.0, 0.2),  // Jupiter
    (14.0, 0.1),   // Saturn
];

/// Leo rising at 10 degrees: Venus, ruler of the 10th, closes on a
/// conjunction with the Sun inside the combustion orb.
pub const COMBUST_VENUS: Layout = [
    (127.0, 0.98),
    (20.0, 13.0),
    (100.0, 1.0),
    (122.0, 1.25),
    (200.0, 0.6),
    (260.0, 0.1),
    (30.0, 0.05),
];

/// Aries rising at 10 degrees: Mars applies by trine to Jupiter (ruler of
/// the 9th) 10 degrees out, while Venus squares Jupiter 3 degrees out.
pub const VENUS_PROHIBITS: Layout = [
    (230.0, 0.98),
    (85.0, 13.0),
    (220.0, 1.3),
    (287.0, 1.2),
    (130.0, 0.7),
    (20.0, 0.1),
    (175.0, 0.05),
];

/// Scorpio rising at 10 degrees: Mars rules both the 1st and the 6th and
/// is retrograde in its fall in a cadent house.
pub const DEBILITATED_SHARED_RULER: Layout = [
    (180.0, 0.98),
    (300.0, 13.0),
    (170.0, 1.3),
    (200.0, 1.2),
    (115.0, -0.2),
    (250.0, 0.1),
    (145.0, 0.05),
];

/// Bodies moving at constant speed from the layout at `epoch`, with
/// equal houses. Enough for the engine's searches to terminate quietly.
pub struct LinearEphemeris {
    pub epoch: f64,
    pub layout: Layout,
    pub ascendant: f64,
}

impl LinearEphemeris {
    pub fn new(layout: Layout, ascendant: f64) -> Self {
        Self {
            epoch: moment().julian_day,
            layout,
            ascendant,
        }
    }
}

impl Ephemeris for LinearEphemeris {
    fn body(&self, planet: Planet, julian_day: f64) -> Result<BodyPosition, EphemerisError> {
        let (lon, speed) = self.layout[planet.index()];
        let elapsed = julian_day - self.epoch;
        Ok(BodyPosition::new(normalize_degrees(lon + speed * elapsed), speed))
    }

    fn houses(&self, _julian_day: f64, _location: &GeoLocation) -> Result<HouseFrame, EphemerisError> {
        Ok(HouseFrame::equal(self.ascendant))
    }
}

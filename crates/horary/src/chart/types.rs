use crate::aspects::types::{AspectInfo, LunarAspect};
use crate::ephemeris::types::{BodyPosition, GeoLocation, HouseFrame};
use crate::solar::SolarAnalysis;
use crate::western::rulers::is_day_chart;
use crate::western::types::{Planet, Sign};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Per-planet snapshot for one chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetPosition {
    pub planet: Planet,
    /// Longitude in degrees (0-360)
    pub longitude: f64,
    pub latitude: f64,
    /// House number (1-12)
    pub house: u8,
    pub sign: Sign,
    pub dignity_score: i32,
    pub retrograde: bool,
    /// Daily motion in longitude, negative when retrograde
    pub speed: f64,
}

/// Days from the chart moment until each planet next stations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StationTable {
    days_ahead: [Option<f64>; 7],
}

impl StationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, planet: Planet, days: f64) -> Self {
        self.days_ahead[planet.index()] = Some(days);
        self
    }

    pub fn days_until(&self, planet: Planet) -> Option<f64> {
        self.days_ahead[planet.index()]
    }

    /// True when `planet` stations before `days` have passed.
    pub fn stations_within(&self, planet: Planet, days: f64) -> bool {
        self.days_until(planet).map_or(false, |d| d < days)
    }
}

/// Planetary day and hour at the chart moment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetaryHour {
    pub day_ruler: Planet,
    pub hour_ruler: Planet,
    /// 0-11 for daytime hours, 12-23 for night hours.
    pub hour_index: u8,
}

/// Sky facts that need the ephemeris beyond the planet positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyContext {
    /// Sun's altitude for the observer, degrees
    pub sun_altitude: f64,
    /// Moon's real daily motion (absolute)
    pub moon_speed: f64,
    pub stations: StationTable,
    pub planetary_hour: Option<PlanetaryHour>,
}

/// The moment a chart is cast for.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartMoment {
    pub local: DateTime<FixedOffset>,
    pub utc: DateTime<Utc>,
    pub timezone_info: String,
    pub julian_day: f64,
}

/// Stage 1: raw ephemeris output.
#[derive(Debug, Clone)]
pub struct PositionsOnly {
    pub bodies: [BodyPosition; 7],
    pub frame: HouseFrame,
}

/// Stage 2: every body placed in a sign and a house.
#[derive(Debug, Clone)]
pub struct PositionsWithHouses {
    pub bodies: [BodyPosition; 7],
    pub signs: [Sign; 7],
    pub houses: [u8; 7],
    pub frame: HouseFrame,
}

impl PositionsWithHouses {
    pub fn is_day(&self) -> bool {
        is_day_chart(self.houses[Planet::Sun.index()])
    }
}

/// Stage 3: solar conditions and dignity scores filled in.
#[derive(Debug, Clone)]
pub struct PositionsWithDignity {
    pub planets: [PlanetPosition; 7],
    pub solar_analyses: [SolarAnalysis; 7],
    pub frame: HouseFrame,
}

/// The aggregate a judgment reads from. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct HoraryChart {
    pub date_time: DateTime<FixedOffset>,
    pub date_time_utc: DateTime<Utc>,
    pub timezone_info: String,
    pub location: GeoLocation,
    pub location_name: String,
    pub planets: [PlanetPosition; 7],
    pub aspects: Vec<AspectInfo>,
    /// Cusps of houses 1-12
    pub houses: [f64; 12],
    /// Ruler of the sign on each cusp, index 0 = 1st house
    pub house_rulers: [Planet; 12],
    pub ascendant: f64,
    pub midheaven: f64,
    pub solar_analyses: [SolarAnalysis; 7],
    pub julian_day: f64,
    pub moon_last_aspect: Option<LunarAspect>,
    pub moon_next_aspect: Option<LunarAspect>,
    pub sky: SkyContext,
}

impl HoraryChart {
    pub fn planet(&self, planet: Planet) -> &PlanetPosition {
        &self.planets[planet.index()]
    }

    pub fn solar(&self, planet: Planet) -> &SolarAnalysis {
        &self.solar_analyses[planet.index()]
    }

    /// Ruler of the sign on the cusp of `house` (1-12, wrapping).
    pub fn house_ruler(&self, house: u8) -> Planet {
        let idx = (house.max(1) as usize - 1) % 12;
        self.house_rulers[idx]
    }

    pub fn is_day(&self) -> bool {
        is_day_chart(self.planet(Planet::Sun).house)
    }

    pub fn ascendant_sign(&self) -> Sign {
        Sign::from_longitude(self.ascendant)
    }

    /// First applying aspect between `a` and `b`.
    pub fn applying_aspect(&self, a: Planet, b: Planet) -> Option<&AspectInfo> {
        self.aspects.iter().find(|x| x.joins(a, b) && x.applying)
    }

    pub fn separating_aspect(&self, a: Planet, b: Planet) -> Option<&AspectInfo> {
        self.aspects.iter().find(|x| x.joins(a, b) && !x.applying)
    }

    pub fn aspect_between(&self, a: Planet, b: Planet) -> Option<&AspectInfo> {
        self.aspects.iter().find(|x| x.joins(a, b))
    }

    /// Every planet standing in `house`.
    pub fn planets_in_house(&self, house: u8) -> impl Iterator<Item = &PlanetPosition> {
        self.planets.iter().filter(move |p| p.house == house)
    }

    pub fn frame(&self) -> HouseFrame {
        HouseFrame {
            cusps: self.houses,
            ascendant: self.ascendant,
            midheaven: self.midheaven,
        }
    }
}

//! Staged chart assembly.
//!
//! Raw ephemeris output is placed in houses, then classified against the
//! Sun, then scored for dignity, and finally frozen into a [`HoraryChart`]
//! together with aspects and the Moon's last and next aspects. Each stage
//! produces a new snapshot; nothing is mutated after the fact.

use crate::aspects::AspectCalculator;
use crate::chart::hours::planetary_hour;
use crate::chart::types::{
    ChartMoment, HoraryChart, PlanetPosition, PositionsOnly, PositionsWithDignity,
    PositionsWithHouses, SkyContext, StationTable,
};
use crate::ephemeris::{BodyPosition, Ephemeris, EphemerisError, GeoLocation};
use crate::solar::SolarAnalyzer;
use crate::western::dignities::{DignityScorer, PlacedPlanet};
use crate::western::houses::house_position;
use crate::western::rulers::sign_ruler;
use crate::western::types::{Planet, Sign};
use horary_config::HorarySettings;

pub struct ChartBuilder<'a> {
    settings: &'a HorarySettings,
}

impl<'a> ChartBuilder<'a> {
    pub fn new(settings: &'a HorarySettings) -> Self {
        Self { settings }
    }

    /// Cast a chart from the ephemeris for one moment and place.
    pub fn build<E: Ephemeris + ?Sized>(
        &self,
        ephemeris: &E,
        moment: ChartMoment,
        location: GeoLocation,
        location_name: &str,
    ) -> Result<HoraryChart, EphemerisError> {
        let jd = moment.julian_day;
        log::info!(
            "casting chart for {} ({}), JD {:.5}, {} ({:.4}, {:.4})",
            moment.local,
            moment.timezone_info,
            jd,
            location_name,
            location.lat,
            location.lon
        );

        let positions = self.positions(ephemeris, jd, &location)?;
        let sky = self.sky(ephemeris, &positions, &moment, &location)?;
        Ok(self.assemble(positions, moment, location, location_name, sky))
    }

    /// Stage 1: body positions and the house frame.
    pub fn positions<E: Ephemeris + ?Sized>(
        &self,
        ephemeris: &E,
        julian_day: f64,
        location: &GeoLocation,
    ) -> Result<PositionsOnly, EphemerisError> {
        let mut bodies = [BodyPosition::new(0.0, 0.0); 7];
        for planet in Planet::ALL {
            bodies[planet.index()] = ephemeris.body(planet, julian_day)?;
        }
        let frame = ephemeris.houses(julian_day, location)?;
        Ok(PositionsOnly { bodies, frame })
    }

    /// Everything the judgment needs from the ephemeris beyond positions.
    pub fn sky<E: Ephemeris + ?Sized>(
        &self,
        ephemeris: &E,
        positions: &PositionsOnly,
        moment: &ChartMoment,
        location: &GeoLocation,
    ) -> Result<SkyContext, EphemerisError> {
        let jd = moment.julian_day;
        let horizon = self.settings.timing.max_future_days;

        let mut stations = StationTable::new();
        for planet in Planet::ALL {
            if let Some(station_jd) = ephemeris.next_station(planet, jd, horizon)? {
                log::debug!("{planet} stations in {:.2} days", station_jd - jd);
                stations = stations.with(planet, station_jd - jd);
            }
        }

        let planetary_hour = planetary_hour(ephemeris, jd, &moment.local, location)?;
        if planetary_hour.is_none() {
            log::warn!("no sunrise or sunset at latitude {:.2}, planetary hour unavailable", location.lat);
        }

        Ok(SkyContext {
            sun_altitude: ephemeris.sun_altitude(jd, location)?,
            moon_speed: self.moon_speed(positions),
            stations,
            planetary_hour,
        })
    }

    /// Absolute daily motion of the Moon, or the configured fallback when
    /// the ephemeris gave nothing usable.
    pub fn moon_speed(&self, positions: &PositionsOnly) -> f64 {
        let speed = positions.bodies[Planet::Moon.index()].speed.abs();
        if speed.is_finite() && speed > self.settings.timing.stationary_speed_threshold {
            speed
        } else {
            log::warn!("unusable Moon speed {speed}, using configured fallback");
            self.settings.timing.default_moon_speed_fallback
        }
    }

    /// Stage 2: signs and houses.
    pub fn place(&self, positions: PositionsOnly) -> PositionsWithHouses {
        let PositionsOnly { bodies, frame } = positions;
        let mut signs = [Sign::Aries; 7];
        let mut houses = [1u8; 7];
        for (i, body) in bodies.iter().enumerate() {
            signs[i] = Sign::from_longitude(body.longitude);
            houses[i] = house_position(body.longitude, &frame.cusps);
        }
        PositionsWithHouses {
            bodies,
            signs,
            houses,
            frame,
        }
    }

    /// Stage 3: solar condition first, then dignity (which depends on it).
    pub fn dignify(&self, placed: PositionsWithHouses, sun_altitude: f64) -> PositionsWithDignity {
        let analyzer = SolarAnalyzer::new(&self.settings.orbs);
        let scorer = DignityScorer::new(self.settings);
        let is_day = placed.is_day();
        let sun_longitude = placed.bodies[Planet::Sun.index()].longitude;

        let solar_analyses = Planet::ALL.map(|planet| {
            let i = planet.index();
            analyzer.classify(
                planet,
                placed.bodies[i].longitude,
                placed.signs[i],
                sun_longitude,
                sun_altitude,
            )
        });

        let planets = Planet::ALL.map(|planet| {
            let i = planet.index();
            let body = placed.bodies[i];
            let spot = PlacedPlanet {
                planet,
                longitude: body.longitude,
                sign: placed.signs[i],
                house: placed.houses[i],
                speed: body.speed,
            };
            PlanetPosition {
                planet,
                longitude: body.longitude,
                latitude: body.latitude,
                house: placed.houses[i],
                sign: placed.signs[i],
                dignity_score: scorer.score(&spot, &placed.frame.cusps, is_day, Some(&solar_analyses[i])),
                retrograde: body.speed < 0.0,
                speed: body.speed,
            }
        });

        PositionsWithDignity {
            planets,
            solar_analyses,
            frame: placed.frame,
        }
    }

    /// Pure assembly from positions and sky facts. Charts built by hand
    /// for tests go through here too.
    pub fn assemble(
        &self,
        positions: PositionsOnly,
        moment: ChartMoment,
        location: GeoLocation,
        location_name: &str,
        sky: SkyContext,
    ) -> HoraryChart {
        let placed = self.place(positions);
        let dignified = self.dignify(placed, sky.sun_altitude);
        self.finish(dignified, moment, location, location_name, sky)
    }

    /// Stage 4: aspects, the Moon's story and house rulers.
    pub fn finish(
        &self,
        dignified: PositionsWithDignity,
        moment: ChartMoment,
        location: GeoLocation,
        location_name: &str,
        sky: SkyContext,
    ) -> HoraryChart {
        let PositionsWithDignity {
            planets,
            solar_analyses,
            frame,
        } = dignified;

        let calculator = AspectCalculator::new(self.settings);
        let aspects = calculator.compute_aspects(&planets, moment.julian_day, &sky.stations);
        let moon_last_aspect = calculator.moon_last_aspect(&planets, sky.moon_speed);
        let moon_next_aspect = calculator.moon_next_aspect(&planets, sky.moon_speed);
        let house_rulers = frame.cusps.map(|cusp| sign_ruler(Sign::from_longitude(cusp)));

        log::debug!(
            "chart assembled: ASC {:.2}, {} aspects, Moon next {:?}",
            frame.ascendant,
            aspects.len(),
            moon_next_aspect.as_ref().map(|a| (a.planet, a.aspect))
        );

        HoraryChart {
            date_time: moment.local,
            date_time_utc: moment.utc,
            timezone_info: moment.timezone_info,
            location,
            location_name: location_name.to_string(),
            planets,
            aspects,
            houses: frame.cusps,
            house_rulers,
            ascendant: frame.ascendant,
            midheaven: frame.midheaven,
            solar_analyses,
            julian_day: moment.julian_day,
            moon_last_aspect,
            moon_next_aspect,
            sky,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::{datetime_to_julian_day, HouseFrame};
    use chrono::{FixedOffset, TimeZone, Utc};

    fn moment() -> ChartMoment {
        let utc = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        ChartMoment {
            local: utc.with_timezone(&FixedOffset::east_opt(0).unwrap()),
            utc,
            timezone_info: "UTC".to_string(),
            julian_day: datetime_to_julian_day(utc),
        }
    }

    #[test]
    fn test_staged_assembly_places_and_scores() {
        let settings = HorarySettings::bundled().unwrap();
        let builder = ChartBuilder::new(&settings);
        let bodies = [
            BodyPosition::new(200.0, 0.98),  // Sun, Libra
            BodyPosition::new(40.0, 13.2),   // Moon, Taurus
            BodyPosition::new(215.0, 1.3),   // Mercury
            BodyPosition::new(350.0, 1.2),   // Venus, Pisces
            BodyPosition::new(100.0, 0.6),   // Mars, Cancer
            BodyPosition::new(250.0, 0.2),   // Jupiter
            BodyPosition::new(5.0, -0.05),   // Saturn, Aries
        ];
        let positions = PositionsOnly {
            bodies,
            frame: HouseFrame::equal(0.0),
        };
        let sky = SkyContext {
            sun_altitude: 30.0,
            moon_speed: builder.moon_speed(&positions),
            stations: StationTable::new(),
            planetary_hour: None,
        };
        let chart = builder.assemble(positions, moment(), GeoLocation { lat: 51.5, lon: 0.0 }, "Test", sky);

        assert_eq!(chart.planet(Planet::Sun).house, 7);
        assert!(chart.is_day());
        assert_eq!(chart.planet(Planet::Moon).sign, Sign::Taurus);
        assert!(chart.planet(Planet::Saturn).retrograde);
        assert_eq!(chart.house_ruler(1), Planet::Mars);
        assert_eq!(chart.house_ruler(7), Planet::Venus);
        assert!((chart.sky.moon_speed - 13.2).abs() < 1e-9);
        // Mercury 15 degrees from the Sun: under the beams in daylight.
        assert!(chart.solar(Planet::Mercury).condition.is_afflicted());
        assert!(chart.planets.iter().all(|p| p.longitude >= 0.0 && p.longitude < 360.0));
    }

    #[test]
    fn test_moon_speed_fallback() {
        let settings = HorarySettings::bundled().unwrap();
        let builder = ChartBuilder::new(&settings);
        let mut bodies = [BodyPosition::new(0.0, 1.0); 7];
        bodies[Planet::Moon.index()] = BodyPosition::new(10.0, 0.0);
        let positions = PositionsOnly {
            bodies,
            frame: HouseFrame::equal(0.0),
        };
        assert_eq!(builder.moon_speed(&positions), 13.0);
    }
}

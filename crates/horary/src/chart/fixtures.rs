//! Hand-built charts for unit tests.

use crate::chart::{ChartBuilder, ChartMoment, HoraryChart, PlanetaryHour, PositionsOnly, SkyContext, StationTable};
use crate::ephemeris::{datetime_to_julian_day, BodyPosition, GeoLocation, HouseFrame};
use chrono::{FixedOffset, TimeZone, Utc};
use horary_config::HorarySettings;

/// `(longitude, daily speed)` for Sun, Moon, Mercury, Venus, Mars, Jupiter, Saturn.
pub type Layout = [(f64, f64); 7];

pub fn settings() -> HorarySettings {
    HorarySettings::bundled().unwrap()
}

/// Bundled settings without term and face tables, so reception only
/// follows domicile, exaltation and triplicity.
pub fn settings_without_minor_dignities() -> HorarySettings {
    let mut settings = settings();
    settings.reception.terms.clear();
    settings.reception.faces.clear();
    settings
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

/// Equal houses from `ascendant`, Sun well above the horizon, no stations.
pub fn chart(settings: &HorarySettings, layout: &Layout, ascendant: f64) -> HoraryChart {
    chart_with_hour(settings, layout, ascendant, None)
}

pub fn chart_with_hour(
    settings: &HorarySettings,
    layout: &Layout,
    ascendant: f64,
    planetary_hour: Option<PlanetaryHour>,
) -> HoraryChart {
    let builder = ChartBuilder::new(settings);
    let positions = PositionsOnly {
        bodies: layout.map(|(lon, speed)| BodyPosition::new(lon, speed)),
        frame: HouseFrame::equal(ascendant),
    };
    let sky = SkyContext {
        sun_altitude: 30.0,
        moon_speed: builder.moon_speed(&positions),
        stations: StationTable::new(),
        planetary_hour,
    };
    builder.assemble(positions, moment(), GeoLocation { lat: 51.5, lon: 0.0 }, "Test", sky)
}

pub mod builder;
pub mod hours;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use builder::ChartBuilder;
pub use hours::{day_ruler, hour_ruler, planetary_hour, CHALDEAN_ORDER};
pub use types::{
    ChartMoment, HoraryChart, PlanetPosition, PlanetaryHour, PositionsOnly, PositionsWithDignity,
    PositionsWithHouses, SkyContext, StationTable,
};

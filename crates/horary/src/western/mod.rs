pub mod dignities;
pub mod houses;
pub mod reception;
pub mod rulers;
pub mod types;

pub use dignities::{DignityScorer, PlacedPlanet};
pub use houses::{house_position, is_cadent, traditional_angularity, Angularity};
pub use reception::{DignityTag, ReceivedAt, ReceptionCalculator, ReceptionKind, ReceptionResult};
pub use rulers::{is_day_chart, sign_ruler};
pub use types::{angular_distance, degree_in_sign, normalize_degrees, Element, Planet, Sign};

use crate::ephemeris::EphemerisError;
use crate::location::LocationError;
use thiserror::Error;

/// Errors surfaced by [`crate::HoraryEngine`] before a judgment can run.
#[derive(Error, Debug)]
pub enum HoraryError {
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("{0}")]
    Calculation(String),
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
}

impl HoraryError {
    /// Name used for `error_type` in the judgment payload.
    pub fn kind(&self) -> &'static str {
        match self {
            HoraryError::Location(_) => "LocationError",
            HoraryError::Configuration(_) => "ConfigurationError",
            HoraryError::Calculation(_) => "CalculationError",
            HoraryError::Ephemeris(_) => "EphemerisError",
        }
    }
}

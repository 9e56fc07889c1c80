//! Place and time resolution.
//!
//! The [`Geocoder`] trait is the seam for turning a place name into
//! coordinates. [`TableGeocoder`] answers from the configured
//! `[locations]` table and also accepts literal `"lat, lon"` input.
//! Time zones are fixed UTC offsets.

use crate::error::HoraryError;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use horary_config::LocationEntry;
use std::collections::BTreeMap;
use thiserror::Error;

/// Accepted `date time` layouts, tried in order.
pub const DATE_FORMATS: [&str; 5] = [
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
    "%d-%m-%Y %H:%M",
    "%Y/%m/%d %H:%M",
];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("Location not found: '{0}'. Please provide a more specific location.")]
    NotFound(String),
    #[error("Invalid coordinates '{0}': latitude must be within ±90 and longitude within ±180")]
    InvalidCoordinates(String),
    #[error("Unsupported timezone '{0}'. Use UTC or a fixed offset such as +02:00")]
    UnsupportedTimezone(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Canonical address shown back to the user.
    pub address: String,
    pub utc_offset: Option<FixedOffset>,
}

pub trait Geocoder {
    fn resolve(&self, query: &str) -> Result<ResolvedLocation, LocationError>;
}

/// Geocoder backed by the configured place table.
#[derive(Debug, Clone, Default)]
pub struct TableGeocoder {
    locations: BTreeMap<String, LocationEntry>,
}

impl TableGeocoder {
    pub fn new(locations: &BTreeMap<String, LocationEntry>) -> Self {
        Self {
            locations: locations.clone(),
        }
    }
}

impl Geocoder for TableGeocoder {
    fn resolve(&self, query: &str) -> Result<ResolvedLocation, LocationError> {
        let key = query.trim().to_lowercase();
        if key.is_empty() {
            return Err(LocationError::NotFound(query.to_string()));
        }

        if let Some(coords) = parse_coordinates(&key)? {
            return Ok(coords);
        }

        let entry = self
            .locations
            .iter()
            .find(|(name, _)| name.to_lowercase() == key)
            .map(|(_, entry)| entry)
            .ok_or_else(|| LocationError::NotFound(query.to_string()))?;

        let utc_offset = match entry.utc_offset.as_deref() {
            Some(text) => Some(parse_utc_offset(text).ok_or_else(|| LocationError::UnsupportedTimezone(text.to_string()))?),
            None => None,
        };
        log::debug!("resolved '{query}' to {} ({:.4}, {:.4})", entry.name, entry.latitude, entry.longitude);

        Ok(ResolvedLocation {
            latitude: entry.latitude,
            longitude: entry.longitude,
            address: entry.name.clone(),
            utc_offset,
        })
    }
}

/// `"51.5, -0.12"` style input. `Ok(None)` when the text is not numeric.
fn parse_coordinates(text: &str) -> Result<Option<ResolvedLocation>, LocationError> {
    let mut parts = text.split(',').map(str::trim);
    let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
        return Ok(None);
    };
    let (Ok(latitude), Ok(longitude)) = (lat.parse::<f64>(), lon.parse::<f64>()) else {
        return Ok(None);
    };
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(LocationError::InvalidCoordinates(text.to_string()));
    }
    Ok(Some(ResolvedLocation {
        latitude,
        longitude,
        address: format!("{latitude:.4}, {longitude:.4}"),
        utc_offset: None,
    }))
}

/// "UTC", "GMT", "Z", "+HH:MM", "-HH:MM" or "+HHMM".
pub fn parse_utc_offset(text: &str) -> Option<FixedOffset> {
    let text = text.trim();
    if ["utc", "gmt", "z"].contains(&text.to_lowercase().as_str()) {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match text.chars().next()? {
        '+' => (1, &text[1..]),
        '-' => (-1, &text[1..]),
        _ => return None,
    };
    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => rest.split_at(2),
        None => (rest, "0"),
    };
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Whole-hour offset from longitude, 15 degrees per hour.
pub fn nautical_offset(longitude: f64) -> FixedOffset {
    let hours = (longitude / 15.0).round().clamp(-12.0, 12.0) as i32;
    FixedOffset::east_opt(hours * 3600).unwrap_or(Utc.fix())
}

fn offset_label(offset: FixedOffset) -> String {
    if offset.local_minus_utc() == 0 {
        "UTC".to_string()
    } else {
        format!("UTC{offset}")
    }
}

/// A local moment with its UTC twin and the zone label used.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTime {
    pub local: DateTime<FixedOffset>,
    pub utc: DateTime<Utc>,
    pub timezone: String,
}

/// Pick the zone: explicit request, then the place's own offset, then
/// the nautical offset from longitude.
pub fn choose_offset(requested: Option<&str>, location: &ResolvedLocation) -> Result<FixedOffset, LocationError> {
    match requested.map(str::trim).filter(|z| !z.is_empty()) {
        Some(zone) => parse_utc_offset(zone).ok_or_else(|| LocationError::UnsupportedTimezone(zone.to_string())),
        None => Ok(location.utc_offset.unwrap_or_else(|| nautical_offset(location.longitude))),
    }
}

/// Parse a date and time in one of [`DATE_FORMATS`] as local time at `offset`.
pub fn parse_local_datetime(date: &str, time: &str, offset: FixedOffset) -> Result<ResolvedTime, HoraryError> {
    let joined = format!("{} {}", date.trim(), time.trim());
    let naive = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&joined, format).ok())
        .ok_or_else(|| {
            HoraryError::Calculation(format!(
                "Unable to parse date '{date}'. Please use DD/MM/YYYY format (e.g., 02/03/2004 for March 2, 2004)"
            ))
        })?;

    let local = offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| HoraryError::Calculation(format!("Invalid local time '{joined}'")))?;
    log::info!("parsed '{joined}' as {local}");

    Ok(ResolvedTime {
        local,
        utc: local.with_timezone(&Utc),
        timezone: offset_label(offset),
    })
}

/// The current moment at `offset`.
pub fn current_time(offset: FixedOffset) -> ResolvedTime {
    let utc = Utc::now();
    ResolvedTime {
        local: utc.with_timezone(&offset),
        utc,
        timezone: offset_label(offset),
    }
}

//! Canonical weather records and the raw backend envelopes they are
//! normalized from.
//!
//! The backend wraps OpenWeather data in a `{location, current,
//! forecast, timestamp}` envelope. Normalization validates that shape at
//! the gateway boundary: required fields missing means a
//! `ValidationError`, optional fields stay `None` rather than being
//! defaulted to placeholders.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use skycast_core::error::ValidationError;

/// Geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Normalized, point-in-time weather reading for a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub country: Option<String>,
    pub temperature: f64,
    pub feels_like: Option<f64>,
    pub humidity: u8,
    pub pressure: u32,
    pub wind_speed: f64,
    pub description: String,
    pub icon: Option<String>,
    pub timestamp: String,
    pub coordinates: Option<Coordinates>,
}

/// One hourly forecast entry, its source timestamp split into calendar
/// date and time-of-day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub temperature: f64,
    pub humidity: u8,
    pub pressure: u32,
    pub wind_speed: f64,
    pub description: String,
    pub icon: Option<String>,
}

/// Normalized forecast list for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub city: String,
    pub country: Option<String>,
    pub entries: Vec<ForecastEntry>,
}

/// Saved location record. Backend-owned; the client only creates and
/// reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub location: LocationRecord,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

// --- Raw backend envelope ---

#[derive(Debug, Deserialize)]
pub(crate) struct RawWeatherEnvelope {
    pub location: Option<RawLocation>,
    pub current: Option<RawCurrent>,
    #[serde(default)]
    pub forecast: Vec<RawForecastItem>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLocation {
    pub city: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCurrent {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<u8>,
    pub pressure: Option<u32>,
    pub wind_speed: Option<f64>,
    pub weather_description: Option<String>,
    pub weather_icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawForecastItem {
    pub timestamp: Option<String>,
    pub temp: Option<f64>,
    pub humidity: Option<u8>,
    pub pressure: Option<u32>,
    pub wind_speed: Option<f64>,
    pub weather_description: Option<String>,
    pub weather_icon: Option<String>,
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField(field))
}

/// Parse a backend timestamp. The backend emits naive ISO-8601; tolerate
/// an explicit offset as well.
fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, ValidationError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }
    raw.parse::<NaiveDateTime>()
        .map_err(|e| ValidationError::Malformed(format!("bad timestamp {:?}: {}", raw, e)))
}

impl WeatherSnapshot {
    pub(crate) fn from_envelope(raw: RawWeatherEnvelope) -> Result<Self, ValidationError> {
        let location = require(raw.location, "location")?;
        let current = require(raw.current, "current")?;

        let coordinates = match (location.lat, location.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates { lat, lon }),
            _ => None,
        };

        Ok(Self {
            city: require(location.city, "location.city")?,
            country: location.country,
            temperature: require(current.temp, "current.temp")?,
            feels_like: current.feels_like,
            humidity: require(current.humidity, "current.humidity")?,
            pressure: require(current.pressure, "current.pressure")?,
            wind_speed: require(current.wind_speed, "current.wind_speed")?,
            description: require(current.weather_description, "current.weather_description")?,
            icon: current.weather_icon,
            timestamp: require(raw.timestamp, "timestamp")?,
            coordinates,
        })
    }
}

impl ForecastEntry {
    pub(crate) fn from_raw(raw: RawForecastItem) -> Result<Self, ValidationError> {
        let stamp = parse_timestamp(&require(raw.timestamp, "forecast.timestamp")?)?;

        Ok(Self {
            date: stamp.date(),
            time: stamp.time(),
            temperature: require(raw.temp, "forecast.temp")?,
            humidity: require(raw.humidity, "forecast.humidity")?,
            pressure: require(raw.pressure, "forecast.pressure")?,
            wind_speed: require(raw.wind_speed, "forecast.wind_speed")?,
            description: require(raw.weather_description, "forecast.weather_description")?,
            icon: raw.weather_icon,
        })
    }
}

impl Forecast {
    pub(crate) fn from_envelope(raw: RawWeatherEnvelope) -> Result<Self, ValidationError> {
        let location = require(raw.location, "location")?;

        let entries = raw
            .forecast
            .into_iter()
            .map(ForecastEntry::from_raw)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            city: require(location.city, "location.city")?,
            country: location.country,
            entries,
        })
    }
}

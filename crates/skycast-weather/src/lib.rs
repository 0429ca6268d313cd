//! Weather data access for SkyCast
//!
//! Talks to the weather backend, normalizes its payloads into canonical
//! records, aggregates forecast entries into daily buckets, and resolves
//! geolocation to local weather.

pub mod client;
pub mod forecast;
pub mod location;
pub mod types;

pub use client::{CreatedLocation, WeatherGateway};
pub use forecast::{group_by_day, ForecastDay};
pub use location::{AcquisitionSettings, LocationProvider, LocationResolver};
pub use types::{
    Coordinates, Forecast, ForecastEntry, LocationRecord, SavedLocation, WeatherSnapshot,
};

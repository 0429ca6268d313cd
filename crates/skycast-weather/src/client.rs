//! HTTP gateway to the weather backend.
//!
//! Every request carries the current session token as a bearer
//! credential when one exists; requests without a session proceed
//! unauthenticated. Raw transport errors and unchecked payloads never
//! cross this boundary: failures collapse into a single descriptive
//! message and payloads are normalized into canonical records.

use serde::Deserialize;
use tracing::instrument;

use skycast_core::error::{ApiError, AppError, ReqwestErrorExt};
use skycast_session::SessionStore;

use crate::types::{
    Forecast, LocationRecord, RawWeatherEnvelope, SavedLocation, WeatherSnapshot,
};

/// Result of saving a location.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedLocation {
    pub id: String,
}

pub struct WeatherGateway {
    client: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl WeatherGateway {
    pub fn new(base_url: &str, session: SessionStore) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    /// Current weather for a city.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_by_city(&self, city: &str) -> Result<WeatherSnapshot, AppError> {
        let raw = self
            .fetch_envelope(&self.city_url(city), "Failed to fetch weather data")
            .await?;
        Ok(WeatherSnapshot::from_envelope(raw)?)
    }

    /// Forecast list for a city. Same endpoint as current weather,
    /// reshaped into entries with split date/time.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast_by_city(&self, city: &str) -> Result<Forecast, AppError> {
        let raw = self
            .fetch_envelope(&self.city_url(city), "Failed to fetch forecast data")
            .await?;
        Ok(Forecast::from_envelope(raw)?)
    }

    /// Current weather for arbitrary coordinates. The backend resolves
    /// the nearest city; the snapshot carries its name.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<WeatherSnapshot, AppError> {
        let url = format!(
            "{}/api/weather/coordinates?lat={}&lon={}",
            self.base_url, lat, lon
        );
        let raw = self
            .fetch_envelope(&url, "Failed to fetch weather data for location")
            .await?;
        Ok(WeatherSnapshot::from_envelope(raw)?)
    }

    /// Saved locations for the authenticated user. Passthrough, not
    /// normalized.
    #[instrument(skip(self), level = "info")]
    pub async fn list_saved_locations(&self) -> Result<Vec<SavedLocation>, AppError> {
        let url = format!("{}/api/locations", self.base_url);
        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        self.handle_json(response, "Failed to fetch saved locations")
            .await
    }

    /// Save a location for the authenticated user.
    #[instrument(skip(self), level = "info")]
    pub async fn save_location(
        &self,
        location: &LocationRecord,
        is_default: bool,
    ) -> Result<CreatedLocation, AppError> {
        let url = format!("{}/api/locations", self.base_url);
        let body = serde_json::json!({
            "location": location,
            "is_default": is_default,
        });

        let response = self
            .with_bearer(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        self.handle_json(response, "Failed to save location").await
    }

    fn city_url(&self, city: &str) -> String {
        format!(
            "{}/api/weather/city/{}",
            self.base_url,
            urlencoding::encode(city)
        )
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.with_bearer(self.client.get(url))
    }

    fn with_bearer(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn fetch_envelope(
        &self,
        url: &str,
        fallback: &str,
    ) -> Result<RawWeatherEnvelope, AppError> {
        let response = self
            .get(url)
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        self.handle_json(response, fallback).await
    }

    /// Collapse a response into a parsed body or a single descriptive
    /// error: the backend's `detail` when present, else the operation's
    /// fixed fallback message.
    async fn handle_json<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<T, AppError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| e.into_network_error().into())
        } else {
            let detail = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| body.get("detail")?.as_str().map(str::to_string));

            Err(ApiError::new(
                status.as_u16(),
                detail.unwrap_or_else(|| fallback.to_string()),
            )
            .into())
        }
    }
}

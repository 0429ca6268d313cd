//! Platform-abstracted geolocation.
//!
//! Platform differences (web vs. native permission prompts, geolocation
//! APIs) live behind the `LocationProvider` capability trait; an
//! implementation is chosen at composition time, never via runtime
//! platform checks in business logic.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use skycast_core::config::LocationConfig;
use skycast_core::error::{ApiError, AppError, PermissionError};

use crate::client::WeatherGateway;
use crate::types::{Coordinates, WeatherSnapshot};

/// Bounds for a coordinate acquisition attempt. The only explicit
/// timeout in the core.
#[derive(Debug, Clone, Copy)]
pub struct AcquisitionSettings {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub maximum_age: Duration,
}

impl From<LocationConfig> for AcquisitionSettings {
    fn from(config: LocationConfig) -> Self {
        Self {
            high_accuracy: config.high_accuracy,
            timeout: Duration::from_secs(config.timeout_secs),
            maximum_age: Duration::from_secs(config.maximum_age_secs),
        }
    }
}

/// Capability interface over platform geolocation.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Ask the platform for location permission. `false` means denied.
    async fn request_permission(&self) -> Result<bool, AppError>;

    /// Acquire current coordinates within the given bounds.
    async fn current_position(
        &self,
        settings: AcquisitionSettings,
    ) -> Result<Coordinates, AppError>;
}

/// Resolves the user's position to a weather snapshot and city name.
pub struct LocationResolver {
    provider: Arc<dyn LocationProvider>,
    gateway: Arc<WeatherGateway>,
    settings: AcquisitionSettings,
}

impl LocationResolver {
    pub fn new(
        provider: Arc<dyn LocationProvider>,
        gateway: Arc<WeatherGateway>,
        settings: AcquisitionSettings,
    ) -> Self {
        Self { provider, gateway, settings }
    }

    /// Weather for the current position.
    ///
    /// Permission denial aborts with a `PermissionError` and no fallback
    /// city. Acquisition and gateway failures collapse into one generic
    /// location error; there is no partial success.
    pub async fn get_location_weather(&self) -> Result<(WeatherSnapshot, String), AppError> {
        let granted = self.provider.request_permission().await?;
        if !granted {
            return Err(PermissionError::LocationDenied.into());
        }

        let position = match self.provider.current_position(self.settings).await {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("Coordinate acquisition failed: {}", e);
                return Err(location_error());
            }
        };

        match self
            .gateway
            .fetch_by_coordinates(position.lat, position.lon)
            .await
        {
            Ok(snapshot) => {
                let city = snapshot.city.clone();
                tracing::info!("Resolved current position to {}", city);
                Ok((snapshot, city))
            }
            Err(e) => {
                tracing::warn!("Weather lookup for current position failed: {}", e);
                Err(location_error())
            }
        }
    }
}

// Status 0 marks a non-HTTP origin.
fn location_error() -> AppError {
    ApiError::new(0, "Failed to get your location").into()
}

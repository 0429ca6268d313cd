//! Composition root: constructs the stores, clients and services, runs
//! startup validation and the notification registrar, then fetches
//! weather for the selected city.
//!
//! Platform capabilities (geolocation, push transport) are injected
//! here. This binary wires environment-backed providers so the core can
//! be exercised end to end against a running backend.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use skycast_core::error::AppError;
use skycast_core::storage::{keys, KeyValueStore};
use skycast_core::{Config, FileStore};
use skycast_notify::{NotificationRegistrar, PushProvider};
use skycast_session::{AuthClient, SessionManager, SessionStore};
use skycast_weather::{
    group_by_day, AcquisitionSettings, Coordinates, LocationProvider, LocationResolver,
    WeatherGateway,
};

/// Geolocation from the environment: permission is granted when
/// `SKYCAST_LAT`/`SKYCAST_LON` are set.
struct EnvLocationProvider;

#[async_trait]
impl LocationProvider for EnvLocationProvider {
    async fn request_permission(&self) -> Result<bool, AppError> {
        Ok(std::env::var("SKYCAST_LAT").is_ok() && std::env::var("SKYCAST_LON").is_ok())
    }

    async fn current_position(
        &self,
        _settings: AcquisitionSettings,
    ) -> Result<Coordinates, AppError> {
        let parse = |name: &str| -> Result<f64, AppError> {
            std::env::var(name)
                .ok()
                .and_then(|v| v.parse().ok())
                .ok_or_else(|| anyhow::anyhow!("{} is not a valid coordinate", name).into())
        };
        Ok(Coordinates { lat: parse("SKYCAST_LAT")?, lon: parse("SKYCAST_LON")? })
    }
}

/// Push transport stub: a token supplied via `SKYCAST_PUSH_TOKEN`.
struct EnvPushProvider;

#[async_trait]
impl PushProvider for EnvPushProvider {
    async fn request_permission(&self) -> Result<bool, AppError> {
        Ok(std::env::var("SKYCAST_PUSH_TOKEN").is_ok())
    }

    async fn acquire_token(&self) -> Result<Option<String>, AppError> {
        Ok(std::env::var("SKYCAST_PUSH_TOKEN").ok())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    skycast_core::init()?;

    let config = Config::load()?;
    let kv: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&Config::config_dir()?)?);

    let session = SessionStore::new();
    let manager = SessionManager::new(
        AuthClient::new(&config.api_base_url),
        session.clone(),
        kv.clone(),
    );

    manager.validate_startup().await;
    let startup = session.snapshot();
    match (&startup.error, startup.is_authenticated) {
        (Some(message), _) => tracing::warn!("{}", message),
        (None, true) => tracing::info!("Restored authenticated session"),
        (None, false) => tracing::info!("No persisted session"),
    }

    let registrar = NotificationRegistrar::new(
        Arc::new(EnvPushProvider),
        AuthClient::new(&config.api_base_url),
        session.clone(),
        kv.clone(),
    );
    registrar.subscribe(|event| {
        tracing::info!("[{:?}] {}: {}", event.kind, event.title, event.body);
    });
    registrar.initialize().await?;

    let gateway = Arc::new(WeatherGateway::new(&config.api_base_url, session.clone()));
    let resolver = LocationResolver::new(
        Arc::new(EnvLocationProvider),
        gateway.clone(),
        config.location.into(),
    );

    // Prefer the current position; fall back to the configured city.
    let city = match resolver.get_location_weather().await {
        Ok((snapshot, city)) => {
            tracing::info!("Local weather: {} {}°C", snapshot.description, snapshot.temperature);
            city
        }
        Err(e) => {
            tracing::info!("{}; using {}", e.user_message(), config.default_city);
            config.default_city.clone()
        }
    };

    let snapshot = gateway.fetch_by_city(&city).await?;
    println!(
        "{}: {} {}°C (humidity {}%, wind {} m/s)",
        snapshot.city,
        snapshot.description,
        snapshot.temperature,
        snapshot.humidity,
        snapshot.wind_speed
    );

    if let Ok(cached) = serde_json::to_string(&snapshot) {
        if let Err(e) = kv.set(keys::CACHED_WEATHER, &cached) {
            tracing::warn!("Failed to cache weather snapshot: {}", e);
        }
    }

    let forecast = gateway.fetch_forecast_by_city(&city).await?;
    if let Ok(cached) = serde_json::to_string(&forecast) {
        if let Err(e) = kv.set(keys::CACHED_FORECAST, &cached) {
            tracing::warn!("Failed to cache forecast: {}", e);
        }
    }
    for day in group_by_day(&forecast.entries) {
        println!("{}: {}° {}", day.date, day.avg_temp, day.description);
    }

    Ok(())
}

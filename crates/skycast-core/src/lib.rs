pub mod config;
pub mod error;
pub mod storage;

pub use config::{Config, LocationConfig};
pub use error::{
    ApiError, AppError, AuthError, NetworkError, PermissionError, StorageError, ValidationError,
};
pub use storage::{FileStore, KeyValueStore, KeyValueStoreExt, MemoryStore};

use anyhow::Result;

/// Initialize the core (tracing/logging)
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("SkyCast core initialized");
    Ok(())
}

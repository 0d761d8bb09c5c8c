//! Shared configuration library for Routine.
//!
//! Configuration is layered: a `.env` file (if present) seeds the process
//! environment, an optional TOML file supplies file-level settings, and
//! environment variables override both. Guard rails run on the composed
//! result and either reject it or attach warnings for the caller to log.

pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader};
pub use models::{
    Config, ConfigMetadata, CorsConfig, DatabaseConfig, PagingConfig,
    ServerConfig, StorageBackend,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};

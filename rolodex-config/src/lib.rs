//! Shared configuration library for Rolodex.
//!
//! Configuration is composed from an optional TOML file, the process
//! environment and an optional `.env` file. Environment values win over the
//! file; built-in defaults fill whatever neither provides.

#![allow(missing_docs)]

pub mod loader;
pub mod models;
pub mod validation;

pub use loader::{
    ConfigLoad, ConfigLoader, ConfigLoaderOptions, error::ConfigLoadError,
};
pub use models::{
    Config, ConfigMetadata, CorsConfig, DatabaseConfig, PhotoConfig,
    ServerConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};

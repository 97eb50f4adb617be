pub mod sources;

use std::path::PathBuf;

use url::Url;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PHOTO_DIRECTORY: &str = "./data/photos";
pub const DEFAULT_PHOTO_URL_PREFIX: &str = "/contacts/image/";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub photos: PhotoConfig,
    pub cors: CorsConfig,
    pub dev_mode: bool,
    pub metadata: ConfigMetadata,
}

impl Config {
    /// Defaults only; no file or environment consulted.
    pub fn defaults() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            photos: PhotoConfig::default(),
            cors: CorsConfig::default(),
            dev_mode: false,
            metadata: ConfigMetadata::default(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    /// `None` runs the service on process-local storage.
    pub url: Option<String>,
}

/// Where photos are written and how their URLs are built.
///
/// Files written under `directory` are served under `url_prefix`; the two
/// must agree for returned photo URLs to resolve.
#[derive(Debug, Clone)]
pub struct PhotoConfig {
    pub directory: PathBuf,
    pub url_prefix: String,
    pub public_base_url: Option<Url>,
    pub max_upload_bytes: usize,
    pub remove_on_delete: bool,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_PHOTO_DIRECTORY),
            url_prefix: DEFAULT_PHOTO_URL_PREFIX.to_string(),
            public_base_url: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            remove_on_delete: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn is_wildcard_included(&self) -> bool {
        self.allowed_origins
            .iter()
            .any(|origin| origin.trim() == "*")
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}

pub mod error;

use once_cell::sync::Lazy;
use std::{fs, path::PathBuf};
use url::Url;

use crate::{
    models::{
        Config, ConfigMetadata, CorsConfig, DatabaseConfig, PhotoConfig,
        ServerConfig, DEFAULT_HOST, DEFAULT_MAX_UPLOAD_BYTES,
        DEFAULT_PHOTO_DIRECTORY, DEFAULT_PHOTO_URL_PREFIX, DEFAULT_PORT,
        sources::{EnvConfig, FileConfig, FileDatabaseConfig},
    },
    validation::{self, ConfigWarnings},
};

pub use error::ConfigLoadError;

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("rolodex.toml"),
        PathBuf::from("config/rolodex.toml"),
    ]
});

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let env_config = EnvConfig::gather();
        self.load_with_env(env_config, env_file_loaded)
    }

    fn load_with_env(
        &self,
        env_config: EnvConfig,
        env_file_loaded: bool,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env_config)?;

        let (config, mut warnings) = self.compose_config(
            file_config,
            env_config,
            config_path,
            env_file_loaded,
        )?;

        warnings.extend(validation::apply_guard_rails(&config)?);

        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let (path, required) = if let Some(explicit) = &self.options.config_path
        {
            (explicit.clone(), true)
        } else if let Some(from_env) = &env_config.config_path {
            (from_env.clone(), true)
        } else {
            match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
            {
                Some(found) => (found.clone(), false),
                None => return Ok((None, None)),
            }
        };

        if !path.exists() {
            if required {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let contents =
            fs::read_to_string(&path).map_err(|err| ConfigLoadError::Io {
                path: path.clone(),
                source: err,
            })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
                path: path.clone(),
                source: err,
            })?;

        Ok((Some(file_config), Some(path)))
    }

    fn compose_config(
        &self,
        file_config: Option<FileConfig>,
        env: EnvConfig,
        config_path: Option<PathBuf>,
        env_file_loaded: bool,
    ) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();

        if config_path.is_none() {
            warnings.push_with_hint(
                "No rolodex.toml detected; using environment variables and defaults",
                "Create rolodex.toml or pass --config to pin settings in a file",
            );
        }

        let FileConfig {
            server: file_server,
            database: file_database,
            photos: file_photos,
            cors: file_cors,
            dev_mode: file_dev_mode,
        } = file_config.unwrap_or_default();

        let server = ServerConfig {
            host: env
                .server_host
                .clone()
                .or(file_server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: env.server_port.or(file_server.port).unwrap_or(DEFAULT_PORT),
        };

        let database = DatabaseConfig {
            url: resolve_database_url(&env, &file_database)?,
        };

        let public_base_url = match env
            .public_base_url
            .clone()
            .or(file_photos.public_base_url)
            .filter(|value| !value.trim().is_empty())
        {
            Some(value) => Some(Url::parse(value.trim()).map_err(|source| {
                ConfigLoadError::InvalidPublicBaseUrl { value, source }
            })?),
            None => None,
        };

        let photos = PhotoConfig {
            directory: env
                .photo_directory
                .clone()
                .or(file_photos.directory)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PHOTO_DIRECTORY)),
            url_prefix: env
                .photo_url_prefix
                .clone()
                .or(file_photos.url_prefix)
                .unwrap_or_else(|| DEFAULT_PHOTO_URL_PREFIX.to_string()),
            public_base_url,
            max_upload_bytes: env
                .photo_max_upload_bytes
                .or(file_photos.max_upload_bytes)
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            remove_on_delete: env
                .photo_remove_on_delete
                .or(file_photos.remove_on_delete)
                .unwrap_or(false),
        };

        let cors = CorsConfig {
            allowed_origins: env
                .cors_allowed_origins
                .clone()
                .or(file_cors.allowed_origins)
                .unwrap_or_default(),
        };

        let dev_mode = env.dev_mode.or(file_dev_mode).unwrap_or(false);

        let config = Config {
            server,
            database,
            photos,
            cors,
            dev_mode,
            metadata: ConfigMetadata {
                config_path,
                env_file_loaded,
            },
        };

        Ok((config, warnings))
    }
}

fn resolve_database_url(
    env: &EnvConfig,
    file_database: &FileDatabaseConfig,
) -> Result<Option<String>, ConfigLoadError> {
    let candidate = env
        .database_url
        .clone()
        .or_else(|| file_database.url.clone())
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    match candidate {
        Some(url) => {
            Url::parse(&url).map_err(|source| {
                ConfigLoadError::InvalidDatabaseUrl { source }
            })?;
            Ok(Some(url))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn file_values_fill_gaps_and_env_wins() {
        let file = write_config(
            r#"
            dev_mode = false

            [server]
            host = "127.0.0.1"
            port = 9000

            [database]
            url = "postgres://file-host/rolodex"

            [photos]
            directory = "/srv/photos"
            url_prefix = "/media/"
            "#,
        );
        let env = EnvConfig {
            server_port: Some(7000),
            database_url: Some("postgres://env-host/rolodex".into()),
            ..EnvConfig::default()
        };

        let load = ConfigLoader::new()
            .with_config_path(file.path())
            .load_with_env(env, false)
            .unwrap();
        let config = load.config;

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7000);
        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://env-host/rolodex")
        );
        assert_eq!(config.photos.directory, PathBuf::from("/srv/photos"));
        assert_eq!(config.photos.url_prefix, "/media/");
        assert_eq!(config.photos.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.metadata.config_path.as_deref(), Some(file.path()));
        assert!(load.warnings.is_empty());
    }

    #[test]
    fn defaults_apply_without_file_or_env() {
        let loader = ConfigLoader::new();
        let (config, warnings) = loader
            .compose_config(None, EnvConfig::default(), None, false)
            .unwrap();

        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.photos.url_prefix, DEFAULT_PHOTO_URL_PREFIX);
        assert!(config.database.url.is_none());
        assert!(!config.photos.remove_on_delete);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigLoader::new()
            .with_config_path(dir.path().join("absent.toml"))
            .load_with_env(EnvConfig::default(), false)
            .unwrap_err();

        assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let file = write_config("[server\nport = ");
        let err = ConfigLoader::new()
            .with_config_path(file.path())
            .load_with_env(EnvConfig::default(), false)
            .unwrap_err();

        assert!(matches!(err, ConfigLoadError::Parse { .. }));
    }

    #[test]
    fn invalid_urls_are_rejected() {
        let loader = ConfigLoader::new();

        let env = EnvConfig {
            database_url: Some("not a url".into()),
            ..EnvConfig::default()
        };
        assert!(matches!(
            loader.compose_config(None, env, None, false),
            Err(ConfigLoadError::InvalidDatabaseUrl { .. })
        ));

        let env = EnvConfig {
            public_base_url: Some("::nope".into()),
            ..EnvConfig::default()
        };
        assert!(matches!(
            loader.compose_config(None, env, None, false),
            Err(ConfigLoadError::InvalidPublicBaseUrl { .. })
        ));
    }

    #[test]
    fn guard_rails_run_after_composition() {
        let env = EnvConfig {
            photo_url_prefix: Some("images".into()),
            ..EnvConfig::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("rolodex.toml");
        std::fs::write(&file, "").unwrap();

        let err = ConfigLoader::new()
            .with_config_path(&file)
            .load_with_env(env, false)
            .unwrap_err();

        assert!(matches!(err, ConfigLoadError::GuardRail(_)));
    }
}

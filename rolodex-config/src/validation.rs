use axum::http::HeaderValue;
use thiserror::Error;

use crate::models::Config;

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error(
        "photo URL prefix `{value}` must start and end with '/' and contain only plain path segments"
    )]
    InvalidUrlPrefix { value: String },
    #[error(
        "photo URL prefix `{value}` collides with the contact routes; pick another path such as `/contacts/image/`"
    )]
    ReservedUrlPrefix { value: String },
    #[error("photo upload limit must be greater than zero")]
    ZeroUploadLimit,
    #[error("CORS origin `{value}` is not a valid header value")]
    InvalidCorsOrigin { value: String },
    #[error(
        "wildcard CORS origin is only allowed with dev_mode enabled; list explicit origins instead"
    )]
    WildcardCorsOutsideDev,
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

impl ConfigWarning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(
        message: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push(&mut self, message: impl Into<String>) {
        self.items.push(ConfigWarning::new(message));
    }

    pub fn push_with_hint(
        &mut self,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.items.push(ConfigWarning::with_hint(message, hint));
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

/// Prefixes whose `{filename}` route would shadow or clash with the
/// `/contacts/{id}` route.
const RESERVED_URL_PREFIXES: &[&str] = &["/contacts/"];

/// The photo route is mounted at `<prefix>{filename}`, so the prefix must be
/// a literal path: slash delimited, no empty segments, no route syntax.
fn is_mountable_prefix(prefix: &str) -> bool {
    prefix.starts_with('/')
        && prefix.ends_with('/')
        && (prefix == "/" || !prefix.contains("//"))
        && !prefix.chars().any(|c| {
            matches!(c, '{' | '}' | '*' | '?' | '#' | '%')
                || c.is_whitespace()
                || c.is_control()
        })
}

/// Reject configurations that would produce unreachable photo URLs or an
/// unsafe CORS policy; collect softer problems as warnings.
pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    let prefix = &config.photos.url_prefix;
    if !is_mountable_prefix(prefix) {
        return Err(ConfigGuardRailError::InvalidUrlPrefix {
            value: prefix.clone(),
        });
    }
    if RESERVED_URL_PREFIXES.contains(&prefix.as_str()) {
        return Err(ConfigGuardRailError::ReservedUrlPrefix {
            value: prefix.clone(),
        });
    }

    if config.photos.max_upload_bytes == 0 {
        return Err(ConfigGuardRailError::ZeroUploadLimit);
    }

    if config.cors.is_wildcard_included() {
        if !config.dev_mode {
            return Err(ConfigGuardRailError::WildcardCorsOutsideDev);
        }
    } else {
        for origin in &config.cors.allowed_origins {
            if HeaderValue::from_str(origin).is_err() {
                return Err(ConfigGuardRailError::InvalidCorsOrigin {
                    value: origin.clone(),
                });
            }
        }
    }

    if config.database.url.is_none() {
        warnings.push_with_hint(
            "No database URL configured; contacts are kept in memory and lost on restart",
            "Set DATABASE_URL or [database].url to persist contacts in PostgreSQL",
        );
    }

    if config.dev_mode {
        warnings.push("dev_mode is enabled; CORS is permissive");
    }

    if let Some(base) = &config.photos.public_base_url
        && base.scheme() != "https"
        && !config.dev_mode
    {
        warnings.push_with_hint(
            format!("public base URL {base} is not served over HTTPS"),
            "Use an https:// URL so photo links work from secure pages",
        );
    }

    Ok(warnings)
}

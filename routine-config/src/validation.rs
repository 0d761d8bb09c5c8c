use axum::http::{Method, header::HeaderName};
use thiserror::Error;

use super::models::{Config, CorsConfig, PagingConfig, StorageBackend};

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error(
        "CORS wildcard origins cannot be combined with credentials when DEV_MODE is false"
    )]
    DangerousCorsWildcard,
    #[error("invalid CORS configuration: {reason}")]
    InvalidCorsConfig { reason: String },
    #[error("invalid paging configuration: {reason}")]
    InvalidPaging { reason: String },
    #[error(
        "postgres storage selected but no database URL is configured in non-dev mode"
    )]
    MissingDatabaseUrl,
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
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

/// Clamps paging values into a usable range, recording what changed.
///
/// A zero maximum cannot be repaired and is rejected outright.
pub fn normalize_paging(
    paging: &mut PagingConfig,
    warnings: &mut ConfigWarnings,
) -> Result<(), ConfigGuardRailError> {
    if paging.max_page_size == 0 {
        return Err(ConfigGuardRailError::InvalidPaging {
            reason: "MAX_PAGE_SIZE must be at least 1".into(),
        });
    }

    if paging.default_page_size == 0 {
        warnings.push("DEFAULT_PAGE_SIZE of 0 raised to 1");
        paging.default_page_size = 1;
    }

    if paging.default_page_size > paging.max_page_size {
        warnings.push_with_hint(
            format!(
                "DEFAULT_PAGE_SIZE {} exceeds MAX_PAGE_SIZE {}; clamped",
                paging.default_page_size, paging.max_page_size
            ),
            "Lower DEFAULT_PAGE_SIZE or raise MAX_PAGE_SIZE",
        );
        paging.default_page_size = paging.max_page_size;
    }

    Ok(())
}

pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    let wildcard = config.cors.is_wildcard_included();
    if wildcard && config.cors.allow_credentials && !config.dev_mode {
        return Err(ConfigGuardRailError::DangerousCorsWildcard);
    }

    validate_cors(&config.cors)?;

    if wildcard && config.cors.allow_credentials {
        warnings.push(
            "CORS credentials allowed alongside wildcard origin; browsers will reject such configuration",
        );
    } else if wildcard {
        warnings.push_with_hint(
            "CORS accepts requests from any origin",
            "List explicit origins in CORS_ALLOWED_ORIGINS",
        );
    }

    if config.storage == StorageBackend::Postgres
        && config.database.primary_url.is_none()
    {
        if !config.dev_mode {
            return Err(ConfigGuardRailError::MissingDatabaseUrl);
        }
        warnings.push_with_hint(
            "DATABASE_URL not configured; the server cannot reach PostgreSQL",
            "Set DATABASE_URL or run with ROUTINE_STORAGE=memory",
        );
    }

    if config.storage == StorageBackend::Memory {
        warnings.push(
            "In-memory storage selected; changes are lost when the process exits",
        );
    }

    Ok(warnings)
}

fn validate_cors(cors: &CorsConfig) -> Result<(), ConfigGuardRailError> {
    if cors.allowed_methods.is_empty() {
        return Err(ConfigGuardRailError::InvalidCorsConfig {
            reason:
                "CORS_ALLOWED_METHODS must include at least one HTTP method"
                    .into(),
        });
    }

    for method in &cors.allowed_methods {
        Method::from_bytes(method.as_bytes()).map_err(|_| {
            ConfigGuardRailError::InvalidCorsConfig {
                reason: format!(
                    "invalid HTTP method `{method}` in CORS_ALLOWED_METHODS"
                ),
            }
        })?;
    }

    if cors.allowed_headers.is_empty() {
        return Err(ConfigGuardRailError::InvalidCorsConfig {
            reason:
                "CORS_ALLOWED_HEADERS must include at least one header name"
                    .into(),
        });
    }

    for header in &cors.allowed_headers {
        HeaderName::from_bytes(header.as_bytes()).map_err(|_| {
            ConfigGuardRailError::InvalidCorsConfig {
                reason: format!(
                    "invalid header name `{header}` in CORS_ALLOWED_HEADERS"
                ),
            }
        })?;
    }

    Ok(())
}

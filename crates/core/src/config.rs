//! Core runtime configuration.
//!
//! This module defines configuration that is resolved once at process startup and then passed
//! into the store and the HTTP layer. Request handling never reads process-wide environment
//! variables; the binaries read them and hand the raw values to the parsers below.

use crate::constants::{ANY_ORIGIN, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT, DEFAULT_STORAGE_DIR};
use crate::{ConfigError, ConfigResult};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

/// Which origins may make cross-origin requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllowedOrigins {
    /// `Access-Control-Allow-Origin: *`
    Any,
    /// Only the listed origins are echoed back
    List(Vec<String>),
}

/// CORS policy applied at the HTTP boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsPolicy {
    pub allowed_origins: AllowedOrigins,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self {
            allowed_origins: AllowedOrigins::Any,
            allowed_methods: vec!["GET".into(), "POST".into(), "OPTIONS".into()],
            allowed_headers: vec!["Content-Type".into()],
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    storage_dir: PathBuf,
    port: u16,
    cors: CorsPolicy,
    max_upload_bytes: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(
        storage_dir: PathBuf,
        port: u16,
        cors: CorsPolicy,
        max_upload_bytes: usize,
    ) -> ConfigResult<Self> {
        if storage_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidInput(
                "storage directory cannot be empty".into(),
            ));
        }

        if max_upload_bytes == 0 {
            return Err(ConfigError::InvalidInput(
                "upload limit must be greater than zero".into(),
            ));
        }

        Ok(Self {
            storage_dir,
            port,
            cors,
            max_upload_bytes,
        })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Address the HTTP server binds: all interfaces on the configured port.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    pub fn cors(&self) -> &CorsPolicy {
        &self.cors
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            port: DEFAULT_PORT,
            cors: CorsPolicy::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve the storage root from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default `storage` directory.
pub fn storage_dir_from_env_value(value: Option<String>) -> PathBuf {
    non_blank(value)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR))
}

/// Parse the listen port from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns 8000.
pub fn port_from_env_value(value: Option<String>) -> ConfigResult<u16> {
    match non_blank(value) {
        None => Ok(DEFAULT_PORT),
        Some(v) => v
            .parse::<u16>()
            .map_err(|source| ConfigError::InvalidPort { value: v, source }),
    }
}

/// Parse the request body limit from an optional string value.
pub fn body_limit_from_env_value(value: Option<String>) -> ConfigResult<usize> {
    match non_blank(value) {
        None => Ok(DEFAULT_MAX_UPLOAD_BYTES),
        Some(v) => v
            .parse::<usize>()
            .map_err(|source| ConfigError::InvalidBodyLimit { value: v, source }),
    }
}

/// Parse the CORS origin policy from an optional string value.
///
/// `*` (or no value) allows any origin. Anything else is a comma-separated list of origins,
/// each of which must start with `http://` or `https://`.
pub fn cors_policy_from_env_value(value: Option<String>) -> ConfigResult<CorsPolicy> {
    let Some(value) = non_blank(value) else {
        return Ok(CorsPolicy::default());
    };

    if value == ANY_ORIGIN {
        return Ok(CorsPolicy::default());
    }

    let origins = value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|origin| {
            if origin == ANY_ORIGIN {
                return Err(ConfigError::InvalidCorsOrigin(
                    "'*' cannot be combined with explicit origins".into(),
                ));
            }
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                return Err(ConfigError::InvalidCorsOrigin(origin.to_string()));
            }
            Ok(origin.trim_end_matches('/').to_string())
        })
        .collect::<ConfigResult<Vec<_>>>()?;

    if origins.is_empty() {
        return Ok(CorsPolicy::default());
    }

    tracing::debug!(?origins, "restricting CORS origins");

    Ok(CorsPolicy {
        allowed_origins: AllowedOrigins::List(origins),
        ..CorsPolicy::default()
    })
}

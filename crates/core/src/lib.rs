//! # PDF Store Core
//!
//! Startup configuration for the PDF store.
//!
//! Values are resolved once, from raw environment strings, into a [`CoreConfig`] that is then
//! passed explicitly to the store and the HTTP layer.
//!
//! **No API concerns**: HTTP routing and CORS middleware belong in `api-rest`; storage belongs
//! in `pdfstore_files`.

pub mod config;
pub mod constants;
mod error;

pub use config::{
    body_limit_from_env_value, cors_policy_from_env_value, port_from_env_value,
    storage_dir_from_env_value, AllowedOrigins, CoreConfig, CorsPolicy,
};
pub use constants::*;
pub use error::{ConfigError, ConfigResult};

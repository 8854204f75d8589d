//! Defaults and environment variable names used when resolving configuration.

/// Default storage root when no explicit directory is configured.
pub const DEFAULT_STORAGE_DIR: &str = "storage";

/// Default HTTP listen port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default request body limit (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// `EnvFilter` directives the binaries add on top of `RUST_LOG`.
pub const DEFAULT_LOG_DIRECTIVES: &[&str] = &[
    "pdfstore_run=info",
    "pdfstore=info",
    "pdfstore_files=info",
    "api_rest=info",
    "tower_http=info",
];

/// Origin value meaning "any origin".
pub const ANY_ORIGIN: &str = "*";

pub const STORAGE_DIR_ENV: &str = "PDFSTORE_STORAGE_DIR";
pub const PORT_ENV: &str = "PORT";
pub const CORS_ORIGIN_ENV: &str = "PDFSTORE_CORS_ORIGIN";
pub const MAX_UPLOAD_BYTES_ENV: &str = "PDFSTORE_MAX_UPLOAD_BYTES";

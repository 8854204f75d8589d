#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid port {value:?}: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("invalid upload limit {value:?}: {source}")]
    InvalidBodyLimit {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("invalid CORS origin: {0}")]
    InvalidCorsOrigin(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

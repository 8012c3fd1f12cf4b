use thiserror::Error;

/// Reasons a [`TableConfig`](crate::TableConfig) is rejected
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("initial capacity must be at least one bucket")]
    ZeroCapacity,
    #[error("load factor threshold must be finite and positive, got {0}")]
    InvalidLoadFactor(f64),
}

use thiserror::Error;

/// Failure to decode a binding or defaults payload.
///
/// Never escapes the lifecycle operations: callers log it and continue with
/// built-in defaults.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed ripple configuration: {0}")]
    Malformed(#[from] serde_json::Error),
}

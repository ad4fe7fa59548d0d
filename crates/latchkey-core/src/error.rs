//! Error types for latchkey configuration

use thiserror::Error;

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration errors
///
/// Lockout and flow transitions never fail; only loading, saving and
/// validating tunables can.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("max_failures must be at least 1")]
    ZeroMaxFailures,

    #[error("Freeze durations must be non-zero")]
    ZeroFreezeDuration,

    #[error("Freeze of {secs}s exceeds the {max}s limit")]
    FreezeTooLong { secs: u64, max: u64 },

    #[error("Second freeze ({second}s) is shorter than first freeze ({first}s)")]
    FreezeOrder { first: u64, second: u64 },

    #[error("passcode_length must be between 1 and {0}")]
    PasscodeLength(usize),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

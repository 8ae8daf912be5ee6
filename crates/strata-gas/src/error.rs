use thiserror::Error;

/// Errors raised while charging gas against a single transaction's limit.
///
/// Both kinds are recoverable: the host halts the transaction and moves on.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GasError {
    /// Charging the amount would exceed the transaction gas limit.
    #[error("out of gas")]
    OutOfGas,

    /// Charging the amount would wrap the u64 range.
    #[error("gas uint64 overflow")]
    Overflow,
}

impl GasError {
    /// Transaction level errors never stop block construction.
    pub fn is_fatal(&self) -> bool {
        false
    }
}

/// Errors raised by the block-wide gas meter when a transaction's usage is
/// committed.
///
/// Block construction cannot proceed past one of these. They must not be
/// retried at the transaction level.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlockGasError {
    #[error("block gas cap exceeded ({descriptor}): consumed {consumed} > cap {cap}")]
    CapacityExceeded {
        consumed: u64,
        cap: u64,
        descriptor: String,
    },

    #[error("block gas uint64 overflow ({descriptor})")]
    Overflow { descriptor: String },
}

impl BlockGasError {
    /// Always true.
    pub fn is_fatal(&self) -> bool {
        true
    }

    /// Descriptor passed by the host with the failing commit.
    pub fn descriptor(&self) -> &str {
        match self {
            BlockGasError::CapacityExceeded { descriptor, .. } => descriptor,
            BlockGasError::Overflow { descriptor } => descriptor,
        }
    }
}

/// Errors loading or validating a [`BlockGasConfig`](crate::BlockGasConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

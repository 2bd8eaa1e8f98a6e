//! Error types for seed derivation and seeded draws.

/// Errors raised while deriving a seed or drawing from a generator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RngError {
    /// The requested height has no finalized block yet.
    #[error("block not found at height {height}")]
    BlockNotFound {
        /// The unresolved block height.
        height: u64,
    },

    /// The block hash or salt could not be mixed into a seed.
    #[error("seed derivation failed: {message}")]
    Derivation {
        /// Details about the failure.
        message: String,
    },

    /// Options and weights passed to a pick were rejected.
    #[error("invalid weights: {message}")]
    InvalidWeights {
        /// Details about the rejected weights.
        message: String,
    },

    /// The weighted scan matched no slot for the drawn value.
    #[error("pick exhausted: draw {draw} matched none of {slots} slots")]
    PickExhausted {
        /// The value drawn modulo the total weight.
        draw: u64,
        /// Number of slots scanned.
        slots: usize,
    },

    /// A range was requested with `min > max`.
    #[error("invalid range: min {min} exceeds max {max}")]
    InvalidRange {
        /// Lower bound.
        min: i64,
        /// Upper bound.
        max: i64,
    },

    /// A JS number was not an exactly representable integer.
    #[error("invalid number: {message}")]
    InvalidNumber {
        /// Details about the rejected value.
        message: String,
    },

    /// A seed string was not a non-negative decimal integer.
    #[error("invalid seed: {message}")]
    InvalidSeed {
        /// Details about the rejected input.
        message: String,
    },
}

impl RngError {
    pub(crate) fn derivation(message: impl Into<String>) -> Self {
        Self::Derivation { message: message.into() }
    }

    pub(crate) fn invalid_weights(message: impl Into<String>) -> Self {
        Self::InvalidWeights { message: message.into() }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, RngError>;

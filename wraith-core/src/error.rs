//! Error types for WRAITH.
//!
//! Every protocol operation is a single-shot computation, so errors are
//! returned to the immediate caller and never retried or logged internally.

use thiserror::Error;

/// Result type alias using `WraithError`.
pub type Result<T> = std::result::Result<T, WraithError>;

/// Main error type for all WRAITH operations.
#[derive(Debug, Error)]
pub enum WraithError {
    // ═══════════════════════════════════════════════════════════════════════════
    // CRYPTOGRAPHIC ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A byte string is not a valid point or scalar for the configured curve.
    #[error("Malformed key: {0}")]
    MalformedKey(String),

    /// The shared-secret hash reduced to zero, or a derived key collapsed to
    /// the identity / zero scalar.
    #[error("Degenerate derivation: {0}")]
    DegenerateDerivation(&'static str),

    /// No secure randomness available for ephemeral key generation.
    #[error("Secure random source unavailable: {0}")]
    RandomSourceUnavailable(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // DATA MODEL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Invalid meta-address format or content.
    #[error("Invalid meta-address: {0}")]
    InvalidMetaAddress(String),

    /// Invalid stealth address format.
    #[error("Invalid stealth address: {0}")]
    InvalidStealthAddress(String),

    /// Invalid announcement format.
    #[error("Invalid announcement: {0}")]
    InvalidAnnouncement(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid hex encoding.
    #[error("Invalid hex encoding: {0}")]
    HexError(#[from] hex::FromHexError),

    // ═══════════════════════════════════════════════════════════════════════════
    // STORAGE & CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SCANNING ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A background scan worker panicked or was cancelled.
    #[error("Scan worker failed: {0}")]
    WorkerFailed(String),
}

impl WraithError {
    /// Returns true if retrying the same call could succeed.
    ///
    /// Only a transient randomness failure qualifies; bad input stays bad.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, WraithError::RandomSourceUnavailable(_) | WraithError::IoError(_))
    }

    /// Returns true if this is a cryptographic error.
    pub fn is_crypto_error(&self) -> bool {
        matches!(
            self,
            WraithError::MalformedKey(_)
                | WraithError::DegenerateDerivation(_)
                | WraithError::RandomSourceUnavailable(_)
        )
    }

    /// Returns true if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            WraithError::MalformedKey(_)
                | WraithError::InvalidMetaAddress(_)
                | WraithError::InvalidStealthAddress(_)
                | WraithError::InvalidAnnouncement(_)
                | WraithError::HexError(_)
        )
    }
}

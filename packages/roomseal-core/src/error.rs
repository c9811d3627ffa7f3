//! # Error Handling
//!
//! Error types for RoomSeal Core.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Capability Errors                                                 │
//! │  │   ├── UnavailableCapability - Secure primitives unreachable         │
//! │  │   └── NoActiveKey           - Cipher holds no room key yet          │
//! │  │                                                                      │
//! │  ├── Crypto Errors                                                     │
//! │  │   ├── EncryptionFailed      - AEAD seal failed                      │
//! │  │   ├── AuthenticationFailure - Tag did not verify                    │
//! │  │   ├── InvalidKey            - Key record has the wrong shape        │
//! │  │   └── RngFailed             - OS randomness unavailable             │
//! │  │                                                                      │
//! │  ├── Envelope Errors                                                   │
//! │  │   ├── MalformedEnvelope     - Not base64 / shorter than a nonce     │
//! │  │   ├── SerializationError                                            │
//! │  │   └── DeserializationError                                          │
//! │  │                                                                      │
//! │  └── Storage Errors                                                    │
//! │      ├── StorageReadError                                              │
//! │      └── StorageWriteError                                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A missing persisted key is not an error: lookups return `Ok(None)`.
//!
//! None of these escape [`MessageCipher::encrypt`](crate::MessageCipher::encrypt)
//! or [`MessageCipher::decrypt`](crate::MessageCipher::decrypt); those degrade
//! to pass-through and log instead. The `try_*` variants surface them.

use thiserror::Error;

/// Result type alias for RoomSeal Core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for RoomSeal Core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ========================================================================
    // Capability Errors (100-199)
    // ========================================================================

    /// Authenticated-encryption or secure-random primitives are unreachable
    #[error("Secure cryptographic primitives are unavailable in this context.")]
    UnavailableCapability,

    /// No room key has been generated or loaded yet
    #[error("No room key is active.")]
    NoActiveKey,

    // ========================================================================
    // Crypto Errors (200-299)
    // ========================================================================

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Ciphertext or tag did not verify under the active key
    #[error("Authentication failed: {0}")]
    AuthenticationFailure(String),

    /// Invalid key format or length
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Random number generation failed
    #[error("Random number generation failed")]
    RngFailed,

    // ========================================================================
    // Envelope Errors (300-399)
    // ========================================================================

    /// Envelope is not valid transport encoding or is shorter than a nonce
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    // ========================================================================
    // Storage Errors (400-499)
    // ========================================================================

    /// Failed to read from the session store
    #[error("Failed to read from storage: {0}")]
    StorageReadError(String),

    /// Failed to write to the session store
    #[error("Failed to write to storage: {0}")]
    StorageWriteError(String),
}

impl Error {
    /// Numeric error code, grouped by category:
    /// - 100-199: Capability
    /// - 200-299: Crypto
    /// - 300-399: Envelope / serialization
    /// - 400-499: Storage
    pub fn code(&self) -> i32 {
        match self {
            Error::UnavailableCapability => 100,
            Error::NoActiveKey => 101,

            Error::EncryptionFailed(_) => 200,
            Error::AuthenticationFailure(_) => 201,
            Error::InvalidKey(_) => 202,
            Error::RngFailed => 203,

            Error::MalformedEnvelope(_) => 300,
            Error::SerializationError(_) => 301,
            Error::DeserializationError(_) => 302,

            Error::StorageReadError(_) => 400,
            Error::StorageWriteError(_) => 401,
        }
    }

    /// Check if this error is recoverable
    ///
    /// Recoverable errors are transient platform conditions that a retry
    /// may clear. A wrong key or a corrupt envelope never heals on retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::RngFailed
                | Error::EncryptionFailed(_)
                | Error::StorageReadError(_)
                | Error::StorageWriteError(_)
        )
    }
}

// ============================================================================
// ERROR CONVERSIONS
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            Error::DeserializationError(err.to_string())
        } else {
            Error::SerializationError(err.to_string())
        }
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::MalformedEnvelope(err.to_string())
    }
}

// ============================================================================
// TESTS
// ============================================================================

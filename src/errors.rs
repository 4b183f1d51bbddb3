use thiserror::Error;

/// All errors that can occur in FieldSeal.
#[derive(Debug, Error)]
pub enum FieldSealError {
    // --- Protocol errors ---
    #[error("No data key registered under '{0}'")]
    KeyNotFound(String),

    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Invalid padding — wrong key or corrupted ciphertext")]
    InvalidPadding,

    #[error("Decrypted value is not valid UTF-8")]
    InvalidEncoding,

    #[error("Cipher failure: {0}")]
    CipherFailure(String),

    // --- Keyfile errors ---
    #[error("Keyfile error: {0}")]
    KeyfileError(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- Handler errors ---
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for FieldSeal results.
pub type Result<T> = std::result::Result<T, FieldSealError>;

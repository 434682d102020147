use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Decompression error")]
    Decompression,

    #[error("Corrupted data")]
    Corrupted,

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("Invalid owner key: {key:?}")]
    InvalidOwner { key: String },

    #[error("Roster too large: {size} entries")]
    DataTooLarge { size: usize },

    #[error("Backend unavailable: {reason}")]
    Unavailable { reason: String },
}

impl PersistenceError {
    /// Whether retrying the same call later can succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            PersistenceError::Io(_) => true,
            PersistenceError::Unavailable { .. } => true,
            PersistenceError::VersionMismatch { .. } => true,
            PersistenceError::Corrupted => false,
            PersistenceError::ChecksumMismatch => false,
            PersistenceError::InvalidOwner { .. } => false,
            _ => false,
        }
    }
}

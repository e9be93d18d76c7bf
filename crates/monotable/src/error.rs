use thiserror::Error;

/// A Result type alias that uses monotable's [`Error`] type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by the runtime and the persistence facade.
#[derive(Debug, Error)]
pub enum Error {
    /// A query was built with a sort-key condition that does not belong to
    /// the queried table or index. Raised before any request is issued.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A key derivation referenced a field the caller did not supply.
    #[error("missing key source field `{0}`")]
    MissingKeyField(String),

    /// A key derivation referenced a field that is not a string or number.
    #[error("key source field `{0}` must be a string or a number")]
    InvalidKeyField(String),

    /// Records must serialize to flat JSON objects.
    #[error("record must serialize to a JSON object")]
    InvalidRecord,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// Mapping between a typed record and its stored item failed.
    #[error("item mapping failed: {0}")]
    Item(#[from] serde_json::Error),
}

/// Failures reported by the storage collaborator. Surfaced unmodified; the
/// facade performs no retries.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage service error: {0}")]
    Service(String),

    #[error("batch get supports at most {max} keys per call, got {requested}")]
    BatchTooLarge { requested: usize, max: usize },

    #[error("unsupported attribute value for `{attribute}`")]
    Conversion { attribute: String },
}

impl StorageError {
    pub(crate) fn service(err: impl std::fmt::Display) -> Self {
        StorageError::Service(err.to_string())
    }
}

/// Failures reported by the field-level encryption collaborator.
#[derive(Debug, Error)]
pub enum CipherError {
    #[error("encryption failed: {0}")]
    Encrypt(String),

    #[error("decryption failed: {0}")]
    Decrypt(String),
}

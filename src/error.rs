use thiserror::Error;

/// Errors produced while fitting, persisting or applying a vectorizer model.
#[derive(Debug, Error)]
pub enum Error {
    /// idf and stop words need at least one document
    #[error("the training corpus contains no documents")]
    EmptyCorpus,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// persisted artifacts violate a model invariant
    #[error("malformed model artifact: {0}")]
    MalformedModel(String),
    #[error("rating {0} is outside 1..=5")]
    InvalidRating(i64),
    #[error("review text has {len} characters, at least {min} are required")]
    TextTooShort { len: usize, min: usize },
    #[error("the model bundle carries no trained classifier")]
    NotTrained,
    #[error("expected {expected} features, got {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Cbor(#[from] serde_cbor::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Embedding input is empty")]
    EmptyEmbeddingInput,

    #[error("Collection not indexed: {0}")]
    CollectionNotFound(String),

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Schema inconsistency: {0}")]
    SchemaInconsistency(String),

    #[error("Index rebuild cancelled")]
    RebuildCancelled,
}

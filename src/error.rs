use thiserror::Error;

use crate::similarity::SimilarityType;

#[derive(Error, Debug)]
pub enum JetSimilarityError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("Operation '{operation}' is not supported by similarity type '{similarity_type}'")]
    UnsupportedOperation {
        operation: &'static str,
        similarity_type: SimilarityType,
    },

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Corrupt data: {0}")]
    CorruptData(String),

    /// Failure reported by a `StructuredStore` implementation's own I/O layer
    #[error("Store error: {0}")]
    StoreIo(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl JetSimilarityError {
    /// True for failures raised by the structured store rather than by the
    /// similarity computation itself.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::StoreIo(_) | Self::Io(_) | Self::Serialization(_))
    }
}

pub type Result<T> = std::result::Result<T, JetSimilarityError>;

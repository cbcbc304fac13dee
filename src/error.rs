//! Error types for storyboard/timeline conversion.

use thiserror::Error;

/// Result type alias for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors that can occur while parsing, mapping or serializing.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Malformed JSON, or JSON that does not fit the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Top-level OTIO object is neither a timeline nor a collection of them.
    #[error("Unsupported OTIO schema: {0}")]
    UnsupportedSchema(String),

    /// A serializable collection without any timeline inside.
    #[error("OTIO collection contains no timeline")]
    EmptyCollection,

    /// Clip carries neither a source range nor an available range.
    #[error("Clip has no time range: {0}")]
    MissingTimeRange(String),

    /// Value could not be turned into its output representation.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ConvertError {
    /// Creates an UnsupportedSchema error.
    pub fn unsupported_schema(schema: impl Into<String>) -> Self {
        Self::UnsupportedSchema(schema.into())
    }

    /// Creates a MissingTimeRange error.
    pub fn missing_time_range(clip: impl Into<String>) -> Self {
        Self::MissingTimeRange(clip.into())
    }

    /// Creates a Serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}

//! Error types for SEG-Y cube access

use thiserror::Error;

/// Main error type for cube addressing and trace I/O
#[derive(Error, Debug)]
pub enum SegyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown line: {0}")]
    UnknownLine(i32),

    #[error("Unknown offset: {0}")]
    UnknownOffset(i32),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Inconsistent geometry: {0}")]
    InconsistentGeometry(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Line, gather and header-line access need a geometry
    #[error("File is unstructured: {0} access requires inline/crossline geometry")]
    Unstructured(&'static str),

    #[error("File is opened read-only")]
    ReadOnly,

    #[error("Invalid SEG-Y format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported sample format code: {0}")]
    UnsupportedFormat(i64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Specialized Result type for SEG-Y operations
pub type Result<T> = std::result::Result<T, SegyError>;

impl From<serde_json::Error> for SegyError {
    fn from(err: serde_json::Error) -> Self {
        SegyError::Serialization(err.to_string())
    }
}

impl From<ndarray::ShapeError> for SegyError {
    fn from(err: ndarray::ShapeError) -> Self {
        SegyError::OutOfRange(err.to_string())
    }
}

//! Error types for calculation result extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Error codes for document processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// File not found (-1)
    FileNotFound = -1,
    /// Empty file (-2)
    EmptyFile = -2,
    /// Markup could not be parsed (-3)
    ParseError = -3,
    /// Reading or writing failed (-4)
    IoError = -4,
    /// Table or JSON export failed (E100)
    ExportFailed = 100,
    /// Configuration file rejected (E200)
    InvalidConfig = 200,
}

/// Main error type for extraction and export.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Empty file: {path}")]
    EmptyFile { path: PathBuf },

    #[error("Cannot decode {path} as {encoding}")]
    Encoding { path: PathBuf, encoding: String },

    #[error("Malformed document {filename}: {source}")]
    Xml {
        filename: String,
        #[source]
        source: roxmltree::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration in {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },
}

impl ExtractError {
    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ExtractError::FileNotFound { .. } => ErrorCode::FileNotFound,
            ExtractError::EmptyFile { .. } => ErrorCode::EmptyFile,
            ExtractError::Encoding { .. } | ExtractError::Xml { .. } => ErrorCode::ParseError,
            ExtractError::Io(_) => ErrorCode::IoError,
            ExtractError::Csv(_) | ExtractError::Json(_) => ErrorCode::ExportFailed,
            ExtractError::InvalidConfig { .. } => ErrorCode::InvalidConfig,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

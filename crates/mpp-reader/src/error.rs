//! Error types for project file reading.

use std::path::PathBuf;
use thiserror::Error;

use mpp_cfb::ContainerError;

/// Errors that abort a read. No partial project is returned.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The compound container could not be parsed.
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// The format string names a generation with no layout.
    #[error("unsupported file format {format:?} (generation {tag})")]
    UnsupportedVersion { tag: u32, format: String },

    /// A structurally required stream is absent.
    #[error("missing stream: {path}")]
    MissingStream { path: String },

    /// A required table ends inside a record.
    #[error(
        "{table} record {index} truncated: stride {stride}, {available} bytes available"
    )]
    TruncatedRecord {
        table: &'static str,
        index: usize,
        stride: usize,
        available: usize,
    },

    /// A stream header carried an unexpected magic number.
    #[error("bad magic {found:#010x} in {path}")]
    BadMagic { path: String, found: u32 },

    /// The file is protected by a read password.
    #[error("file is password protected")]
    PasswordProtected,

    /// A structure is internally inconsistent.
    #[error("corrupt project file: {message}")]
    Corrupt { message: String },

    /// Strict mode rejected a read that recorded diagnostics.
    #[error("read produced {count} diagnostics (first: {first})")]
    Diagnostics { count: usize, first: String },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for read operations.
pub type Result<T> = std::result::Result<T, ReadError>;

impl ReadError {
    /// Create a Corrupt error.
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }

    /// Create a MissingStream error.
    pub fn missing_stream(path: impl Into<String>) -> Self {
        Self::MissingStream { path: path.into() }
    }
}

//! Error types for compound container parsing.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why a sector chain walk was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainFault {
    /// The chain visited the same sector twice.
    Cycle { sector: u32 },
    /// The chain referenced a sector outside the file (or the mini stream).
    OutOfRange { sector: u32 },
    /// The chain reached a free or reserved sector marker.
    Unallocated { sector: u32 },
    /// The chain ended before the declared stream size was reached.
    TooShort { expected: u64, actual: u64 },
}

impl fmt::Display for ChainFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cycle { sector } => write!(f, "sector {sector} visited twice"),
            Self::OutOfRange { sector } => write!(f, "sector {sector} is past end of file"),
            Self::Unallocated { sector } => write!(f, "sector {sector:#010x} is not allocated"),
            Self::TooShort { expected, actual } => {
                write!(f, "chain holds {actual} bytes, stream declares {expected}")
            }
        }
    }
}

/// Errors that can occur when reading or writing a compound container.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The buffer ends before a structure that must be read.
    #[error("container truncated: need {needed} bytes at offset {offset}, have {actual}")]
    Truncated {
        offset: usize,
        needed: usize,
        actual: usize,
    },

    /// The first eight bytes are not the compound document signature.
    #[error("not a compound document (bad signature)")]
    BadSignature,

    /// Header fields are inconsistent.
    #[error("invalid container header: {message}")]
    InvalidHeader { message: String },

    /// Sector shift other than 9 (512 bytes) or 12 (4096 bytes).
    #[error("unsupported sector shift {shift}")]
    UnsupportedSectorSize { shift: u16 },

    /// A FAT, mini FAT or DIFAT chain is broken.
    #[error("corrupt sector chain starting at {start}: {fault}")]
    CorruptSectorChain { start: u32, fault: ChainFault },

    /// The directory tree is malformed.
    #[error("corrupt directory: {message}")]
    CorruptDirectory { message: String },

    /// Stream path rejected by the writer.
    #[error("invalid stream path: {path:?}")]
    InvalidPath { path: String },

    /// The writer cannot lay out this many sectors without DIFAT sectors.
    #[error("container too large: {sectors} sectors")]
    TooLarge { sectors: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for container operations.
pub type Result<T> = std::result::Result<T, ContainerError>;

impl ContainerError {
    /// Create an InvalidHeader error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create a CorruptDirectory error.
    pub fn corrupt_directory(message: impl Into<String>) -> Self {
        Self::CorruptDirectory {
            message: message.into(),
        }
    }

    /// Create a CorruptSectorChain error.
    pub fn corrupt_chain(start: u32, fault: ChainFault) -> Self {
        Self::CorruptSectorChain { start, fault }
    }
}

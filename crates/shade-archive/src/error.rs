use std::io;
use std::path::PathBuf;

/// Errors produced by the archive container layer.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// I/O error while reading or writing archive bytes.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The input archive path does not exist or is not a regular file.
    #[error("input archive not found: {0}")]
    NotFound(PathBuf),

    /// An entry inside an archive could not be decoded.
    #[error("malformed entry in {archive}: {reason}")]
    MalformedEntry { archive: PathBuf, reason: String },
}

/// Convenience alias used throughout the archive crate.
pub type ArchiveResult<T> = std::result::Result<T, ArchiveError>;

use shade_archive::ArchiveError;

/// Errors produced by resource transformers.
///
/// Both kinds are fatal for the surrounding merge: a resource that cannot be
/// read or written should stop the build rather than silently produce a
/// truncated artifact. Duplicate content is not an error.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The claimed entry's content could not be fully read as UTF-8 text.
    #[error("failed to read resource {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// The destination sink rejected the finalized entry.
    #[error("failed to write merged resource {path}: {source}")]
    Write {
        path: String,
        source: ArchiveError,
    },
}

/// Convenience alias used throughout the transform crate.
pub type TransformResult<T> = std::result::Result<T, TransformError>;

use shade_archive::ArchiveError;
use shade_transform::TransformError;

/// Errors produced by the merge session layer.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// I/O error outside the archive container layer.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure reading an input archive or writing the output container.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// A transformer rejected an entry or its finalize write failed.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// The merge configuration could not be parsed.
    #[error("failed to parse merge config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// No input archives were found under the given paths.
    #[error("no input archives found")]
    NoInputs,
}

/// Convenience alias used throughout the merge crate.
pub type MergeResult<T> = std::result::Result<T, MergeError>;

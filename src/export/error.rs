//! Error types for export operations.

use thiserror::Error;

/// Errors that can occur while building the export archive.
///
/// Any single failure aborts the whole export; there is no partial-archive
/// fallback.
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O error while writing the archive
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Structural zip error
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Failed to read the bytes of one entry
    #[error("Failed to read image '{name}': {source}")]
    SourceRead {
        /// Original file name of the unreadable entry
        name: String,
        /// Underlying read error
        source: std::io::Error,
    },
}

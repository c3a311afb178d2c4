//! Error types for code-asset planning

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for asset planning
pub type AssetResult<T> = Result<T, AssetError>;

/// Error types for code-asset planning
#[derive(Error, Debug)]
pub enum AssetError {
    /// The configured source directory is absent or not a directory
    #[error("Function source directory {path:?} does not exist or is not a directory")]
    SourceMissing {
        /// The missing path
        path: PathBuf,
    },

    /// The source tree could not be read
    #[error("Failed to read function source tree: {0}")]
    Io(#[from] std::io::Error),
}

//! Error types for stack synthesis

use thiserror::Error;

use crate::assets::AssetError;
use crate::parameters::ParameterError;

/// Result type alias for stack synthesis
pub type SynthesisResult<T> = Result<T, SynthesisError>;

/// Error types for stack synthesis
#[derive(Error, Debug)]
pub enum SynthesisError {
    /// A deploy-time parameter failed validation
    #[error("Invalid deploy-time parameter: {0}")]
    Parameter(#[from] ParameterError),

    /// The code asset could not be planned
    #[error("Failed to plan code asset: {0}")]
    Asset(#[from] AssetError),

    /// Stack name the engine would reject
    #[error(
        "Stack name {name:?} must start with a letter and contain only \
         alphanumerics and hyphens, at most 128 characters"
    )]
    InvalidStackName {
        /// The rejected name
        name: String,
    },

    /// Function name outside the platform limit
    #[error("Function name {name:?} must be between 1 and 64 characters")]
    InvalidFunctionName {
        /// The rejected name
        name: String,
    },

    /// Invocation timeout outside the platform range
    #[error("Timeout of {seconds} s is outside the supported range 1-900 s")]
    InvalidTimeout {
        /// The rejected timeout in seconds
        seconds: u64,
    },

    /// The artifact could not be serialized
    #[error("Failed to serialize template: {0}")]
    Serialization(#[from] serde_json::Error),
}

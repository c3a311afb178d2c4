//! Error types for parameter validation

use thiserror::Error;

/// Result type alias for parameter validation
pub type ParameterResult<T> = Result<T, ParameterError>;

/// Error types for deploy-time parameter validation
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParameterError {
    /// Memory size outside the range the active revision accepts
    #[error("Memory size {value} MB is outside the supported range {min}-{max} MB")]
    MemorySizeOutOfRange {
        /// Requested memory size in MB
        value: u32,
        /// Smallest accepted size in MB
        min: u32,
        /// Largest accepted size in MB
        max: u32,
    },

    /// Secret-bundle name missing entirely
    #[error("Secret bundle name must not be empty")]
    EmptySecretsName,

    /// Secret-bundle name the secret store would reject
    #[error("Secret bundle name {name:?} is not a valid secret store identifier")]
    InvalidSecretsName {
        /// The rejected name
        name: String,
    },
}

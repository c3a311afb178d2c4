//! Deploy-time parameter surface
//!
//! The original template declared these as engine-side parameters. Here
//! they are synthesis inputs: invalid values are rejected before any
//! resource is declared, and the artifact carries the resolved values
//! baked in. Secret references stay symbolic and are resolved by the
//! engine during apply.

mod error;

pub use error::{ParameterError, ParameterResult};

/// Default secret-bundle name holding the messaging credentials.
pub const DEFAULT_SECRETS_NAME: &str = "slackllm";

/// Default function memory size in MB.
pub const DEFAULT_MEMORY_SIZE: u32 = 512;

/// Longest name the secret store accepts.
const MAX_SECRETS_NAME_LEN: usize = 512;

/// Inclusive memory bounds imposed by the active template revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryLimits {
    /// Smallest allocatable memory size in MB
    pub min: u32,
    /// Largest allocatable memory size in MB
    pub max: u32,
}

impl MemoryLimits {
    /// Whether `value` lies within the bounds.
    #[must_use]
    pub const fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Externally supplied deploy-time inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackParameters {
    /// Secret-bundle name the credential references resolve against
    pub secrets_name: String,
    /// Function memory size in MB
    pub memory_size: u32,
}

impl Default for StackParameters {
    fn default() -> Self {
        Self {
            secrets_name: DEFAULT_SECRETS_NAME.to_string(),
            memory_size: DEFAULT_MEMORY_SIZE,
        }
    }
}

impl StackParameters {
    /// Validates the inputs against the revision's memory bounds.
    ///
    /// # Errors
    ///
    /// Returns `ParameterError` if the memory size is out of range or the
    /// secret-bundle name is not a valid secret store identifier.
    pub fn validate(&self, limits: &MemoryLimits) -> ParameterResult<()> {
        if !limits.contains(self.memory_size) {
            return Err(ParameterError::MemorySizeOutOfRange {
                value: self.memory_size,
                min: limits.min,
                max: limits.max,
            });
        }
        if self.secrets_name.is_empty() {
            return Err(ParameterError::EmptySecretsName);
        }
        let valid_name = self.secrets_name.len() <= MAX_SECRETS_NAME_LEN
            && self.secrets_name.chars().all(is_secret_name_char);
        if !valid_name {
            return Err(ParameterError::InvalidSecretsName {
                name: self.secrets_name.clone(),
            });
        }
        Ok(())
    }
}

fn is_secret_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '+' | '=' | '.' | '@' | '-')
}

/// Renders the deploy-time reference for one field of the secret bundle.
///
/// The engine swaps the placeholder for the stored value while applying
/// the stack; the plaintext never appears in the template.
#[must_use]
pub fn secret_ref(bundle: &str, key: &str) -> String {
    format!("{{{{resolve:secretsmanager:{bundle}:SecretString:{key}}}}}")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{secret_ref, MemoryLimits, ParameterError, StackParameters};

    const LIMITS: MemoryLimits = MemoryLimits { min: 128, max: 2048 };

    #[test]
    fn test_defaults_match_the_published_template() {
        let parameters = StackParameters::default();
        assert_eq!(parameters.secrets_name, "slackllm");
        assert_eq!(parameters.memory_size, 512);
        assert_eq!(parameters.validate(&LIMITS), Ok(()));
    }

    #[test]
    fn test_memory_bounds_are_inclusive() {
        assert!(LIMITS.contains(128));
        assert!(LIMITS.contains(2048));
        assert!(!LIMITS.contains(127));
        assert!(!LIMITS.contains(2049));
    }

    #[test]
    fn test_out_of_range_memory_is_rejected_with_the_bounds() {
        let parameters = StackParameters {
            memory_size: 64,
            ..StackParameters::default()
        };
        assert_eq!(
            parameters.validate(&LIMITS),
            Err(ParameterError::MemorySizeOutOfRange {
                value: 64,
                min: 128,
                max: 2048,
            })
        );
    }

    #[test]
    fn test_empty_secrets_name_is_rejected() {
        let parameters = StackParameters {
            secrets_name: String::new(),
            ..StackParameters::default()
        };
        assert_eq!(parameters.validate(&LIMITS), Err(ParameterError::EmptySecretsName));
    }

    #[test]
    fn test_secrets_name_charset_follows_the_secret_store() {
        let accepted = StackParameters {
            secrets_name: "prod/slackllm_v2.bundle@eu-1".to_string(),
            ..StackParameters::default()
        };
        assert_eq!(accepted.validate(&LIMITS), Ok(()));

        let rejected = StackParameters {
            secrets_name: "slack llm".to_string(),
            ..StackParameters::default()
        };
        assert_eq!(
            rejected.validate(&LIMITS),
            Err(ParameterError::InvalidSecretsName {
                name: "slack llm".to_string(),
            })
        );
    }

    #[test]
    fn test_overlong_secrets_name_is_rejected() {
        let parameters = StackParameters {
            secrets_name: "a".repeat(513),
            ..StackParameters::default()
        };
        assert!(matches!(
            parameters.validate(&LIMITS),
            Err(ParameterError::InvalidSecretsName { .. })
        ));
    }

    #[test]
    fn test_secret_refs_point_into_the_bundle() {
        assert_eq!(
            secret_ref("slackllm", "SLACK_BOT_TOKEN"),
            "{{resolve:secretsmanager:slackllm:SecretString:SLACK_BOT_TOKEN}}"
        );
    }
}

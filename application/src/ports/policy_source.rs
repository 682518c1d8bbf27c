//! Policy access ports
//!
//! [`PolicySource`] hands the engine a fresh policy snapshot per decision.
//! [`PolicyAccessorPort`] adds runtime get/set by key, used by the host
//! console's `/set` command.

use ballot_domain::{ConfigIssue, VotingPolicy};

/// Port for reading the current voting policy
pub trait PolicySource: Send + Sync {
    fn current(&self) -> VotingPolicy;
}

/// A fixed policy never changes
impl PolicySource for VotingPolicy {
    fn current(&self) -> VotingPolicy {
        *self
    }
}

/// Errors from runtime policy access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyAccessError {
    /// The key is not recognized.
    UnknownKey { key: String },
    /// The provided value is invalid for this key.
    InvalidValue { key: String, message: String },
}

impl std::fmt::Display for PolicyAccessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyAccessError::UnknownKey { key } => write!(f, "unknown policy key: {}", key),
            PolicyAccessError::InvalidValue { key, message } => {
                write!(f, "invalid value for '{}': {}", key, message)
            }
        }
    }
}

impl std::error::Error for PolicyAccessError {}

/// Port for runtime policy access.
///
/// Implementors provide get/set for the `voting.*` keys, rejecting
/// out-of-range values and returning validation warnings on set.
pub trait PolicyAccessorPort: PolicySource {
    /// Get the current value of a policy key.
    fn policy_get(&self, key: &str) -> Result<String, PolicyAccessError>;

    /// Set a policy key from its textual value.
    ///
    /// Returns validation warnings (if any) on success.
    fn policy_set(&self, key: &str, value: &str) -> Result<Vec<ConfigIssue>, PolicyAccessError>;

    /// List all known policy key names.
    fn policy_keys(&self) -> Vec<&'static str>;
}

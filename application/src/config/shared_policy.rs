//! Runtime-adjustable voting policy.
//!
//! The engine reads a fresh [`VotingPolicy`] snapshot for every decision, so
//! a change made here applies to the next ballot opened and to the next
//! tally. Ballots already open keep the timeout they were created with.

use crate::ports::policy_source::{PolicyAccessError, PolicyAccessorPort, PolicySource};
use ballot_domain::{ConfigIssue, PolicyKey, VotingPolicy};
use std::sync::RwLock;
use tracing::info;

pub struct SharedPolicy {
    inner: RwLock<VotingPolicy>,
}

impl SharedPolicy {
    pub fn new(policy: VotingPolicy) -> Self {
        Self {
            inner: RwLock::new(policy),
        }
    }

    /// Replace the whole policy
    pub fn replace(&self, policy: VotingPolicy) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = policy;
    }
}

impl Default for SharedPolicy {
    fn default() -> Self {
        Self::new(VotingPolicy::default())
    }
}

impl PolicySource for SharedPolicy {
    fn current(&self) -> VotingPolicy {
        *self.inner.read().unwrap_or_else(|e| e.into_inner())
    }
}

impl PolicyAccessorPort for SharedPolicy {
    fn policy_get(&self, key: &str) -> Result<String, PolicyAccessError> {
        let key = parse_key(key)?;
        Ok(key.read(&self.current()))
    }

    fn policy_set(&self, key: &str, value: &str) -> Result<Vec<ConfigIssue>, PolicyAccessError> {
        let parsed = parse_key(key)?;

        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let updated = parsed
            .apply(*guard, value)
            .map_err(|message| PolicyAccessError::InvalidValue {
                key: parsed.as_str().to_string(),
                message,
            })?;
        *guard = updated;
        drop(guard);

        info!("Policy changed: {} = {}", parsed, parsed.read(&updated));
        Ok(updated.validate())
    }

    fn policy_keys(&self) -> Vec<&'static str> {
        PolicyKey::ALL.iter().map(|k| k.as_str()).collect()
    }
}

fn parse_key(key: &str) -> Result<PolicyKey, PolicyAccessError> {
    key.parse().map_err(|_| PolicyAccessError::UnknownKey {
        key: key.to_string(),
    })
}

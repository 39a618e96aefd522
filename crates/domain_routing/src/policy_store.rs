//! Versioned routing policy store
//!
//! Holds the active rule set and its version as one guarded value. The
//! rules and the version are only ever replaced together, and only ever read
//! together, so no reader can pair old rules with a new version.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

use crate::rule::{Rule, RuleContext, RulePredicate};

/// Point-in-time copy of the routing policy
///
/// Cloning is cheap; the rule list is shared.
#[derive(Debug, Clone, Default)]
pub struct PolicySnapshot {
    rules: Arc<Vec<Rule>>,
    rules_version: u64,
}

impl PolicySnapshot {
    pub fn rules(&self) -> &[Rule] {
        self.rules.as_slice()
    }

    pub fn version(&self) -> u64 {
        self.rules_version
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Enabled rules whose condition holds, in stored order
    ///
    /// Building block for custom policies; the built-in routing stages do
    /// not consult it.
    pub fn matching_rules<'s, P>(&'s self, predicate: &P, ctx: &RuleContext<'_>) -> Vec<&'s Rule>
    where
        P: RulePredicate + ?Sized,
    {
        self.rules
            .iter()
            .filter(|rule| rule.is_enabled() && predicate.matches(rule, ctx))
            .collect()
    }
}

/// Lightweight policy summary for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStatus {
    pub rules_version: u64,
    pub rules_count: usize,
}

/// Owner of the routing policy
///
/// Policy updates are whole-set replacements; there is no incremental
/// add or remove.
#[derive(Debug, Default)]
pub struct PolicyStore {
    state: RwLock<PolicySnapshot>,
}

impl PolicyStore {
    /// Creates an empty store at version 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every rule and bumps the version by one
    ///
    /// Each incoming rule is stamped with the version in force before the
    /// replacement. Returns the new version. An empty rule list is a valid
    /// replacement and still bumps the version.
    pub fn replace(&self, rules: Vec<Rule>) -> u64 {
        let rules_count = rules.len();
        let rules_version = {
            let mut state = self.write();
            let stamp = state.rules_version;
            let stamped: Vec<Rule> = rules
                .into_iter()
                .map(|mut rule| {
                    rule.version = Some(stamp);
                    rule
                })
                .collect();

            *state = PolicySnapshot {
                rules: Arc::new(stamped),
                rules_version: stamp + 1,
            };
            state.rules_version
        };

        info!(rules_count, rules_version, "Replaced routing rules");
        rules_version
    }

    /// Consistent copy of the current rules and version
    pub fn snapshot(&self) -> PolicySnapshot {
        self.read().clone()
    }

    pub fn status(&self) -> PolicyStatus {
        let state = self.read();
        PolicyStatus {
            rules_version: state.rules_version,
            rules_count: state.rules.len(),
        }
    }

    pub fn version(&self) -> u64 {
        self.read().rules_version
    }

    // The snapshot is swapped in whole, so a poisoned lock still guards a
    // consistent value.
    fn read(&self) -> RwLockReadGuard<'_, PolicySnapshot> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PolicySnapshot> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_is_empty_at_version_zero() {
        let store = PolicyStore::new();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.version(), 0);
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_replace_stamps_pre_increment_version() {
        let store = PolicyStore::new();
        store.replace(vec![Rule::new("fraud", "high")]);
        let version = store.replace(vec![Rule::new("severity", "high"), Rule::new("complexity", "mid")]);

        assert_eq!(version, 2);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.rules().iter().all(|r| r.version == Some(1)));
    }

    #[test]
    fn test_snapshot_outlives_replacement() {
        let store = PolicyStore::new();
        store.replace(vec![Rule::new("fraud", "high")]);
        let before = store.snapshot();
        store.replace(vec![]);

        assert_eq!(before.version(), 1);
        assert_eq!(before.len(), 1);
        assert_eq!(store.status(), PolicyStatus { rules_version: 2, rules_count: 0 });
    }
}

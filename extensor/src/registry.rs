//! Ordered registry of policies and key routing.

use std::fmt;

use extensor_core::KeyContext;

use crate::error::CacheError;
use crate::policy::{GlobalConfig, KeyPolicy, Policy};

/// A policy matched for one key, with the parameters captured from it.
pub struct Route<'a, V> {
    policy: &'a Policy<V>,
    context: KeyContext,
}

impl<'a, V> Route<'a, V> {
    /// The matched policy.
    pub fn policy(&self) -> &'a Policy<V> {
        self.policy
    }

    /// Key and captured parameters.
    pub fn context(&self) -> &KeyContext {
        &self.context
    }

    /// The routed key.
    pub fn key(&self) -> &str {
        self.context.key()
    }
}

impl<V> fmt::Debug for Route<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.policy.pattern().as_str())
            .field("context", &self.context)
            .finish()
    }
}

/// Append-only list of policies, matched in registration order.
///
/// Patterns registered earlier shadow later ones that match the same keys;
/// duplicates are not detected.
pub struct PolicyRegistry<V> {
    global: GlobalConfig,
    policies: Vec<Policy<V>>,
}

impl<V> fmt::Debug for PolicyRegistry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyRegistry")
            .field("global", &self.global)
            .field("policies", &self.policies)
            .finish()
    }
}

impl<V> PolicyRegistry<V> {
    /// Creates an empty registry with the given defaults.
    pub fn new(global: GlobalConfig) -> Self {
        Self {
            global,
            policies: Vec::new(),
        }
    }

    /// Defaults merged under every registered policy.
    pub fn global(&self) -> &GlobalConfig {
        &self.global
    }

    /// Validates `key_policy`, merges the defaults under it and appends it.
    pub fn register(&mut self, key_policy: KeyPolicy<V>) -> Result<(), CacheError> {
        let policy = Policy::merge(key_policy, &self.global)?;
        tracing::debug!(
            pattern = policy.pattern().as_str(),
            position = self.policies.len(),
            "policy registered"
        );
        self.policies.push(policy);
        Ok(())
    }

    /// Finds the first policy whose pattern matches `key`.
    pub fn resolve(&self, key: &str) -> Option<Route<'_, V>> {
        self.policies.iter().find_map(|policy| {
            policy
                .pattern()
                .capture(key)
                .map(|context| Route { policy, context })
        })
    }

    /// Number of registered policies.
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Returns `true` when no policy is registered.
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Policies in match order.
    pub fn iter(&self) -> impl Iterator<Item = &Policy<V>> {
        self.policies.iter()
    }
}

impl<V> Default for PolicyRegistry<V> {
    fn default() -> Self {
        Self::new(GlobalConfig::default())
    }
}

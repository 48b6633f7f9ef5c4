//! Match results passed to callbacks.
//!
//! When a key matches a registered pattern, the matcher produces a
//! [`KeyContext`]: the key itself plus the value captured for every placeholder.
//! The same context is handed to the read, write, update and evict callbacks of
//! the matched policy, so a callback for `user/{id}` can simply look up
//! `ctx.param("id")`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

/// Placeholder values captured from a key, by placeholder name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyParams(HashMap<SmolStr, SmolStr>);

impl KeyParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value captured for `name`.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(SmolStr::as_str)
    }

    /// Returns `true` if a placeholder called `name` was captured.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of captured placeholders.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the pattern had no placeholders.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for KeyParams
where
    K: Into<SmolStr>,
    V: Into<SmolStr>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Debug, PartialEq, Eq)]
struct KeyContextInner {
    key: SmolStr,
    params: KeyParams,
}

/// The result of matching a key against a pattern.
///
/// `KeyContext` wraps its data in [`Arc`], so cloning it for every callback
/// invocation (including write-back retries) only bumps a reference count.
///
/// ```
/// use extensor_core::{KeyContext, KeyParams};
///
/// let params: KeyParams = [("id", "42")].into_iter().collect();
/// let ctx = KeyContext::new("user/42", params);
///
/// assert_eq!(ctx.key(), "user/42");
/// assert_eq!(ctx.param("id"), Some("42"));
/// assert_eq!(ctx.param("missing"), None);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct KeyContext {
    inner: Arc<KeyContextInner>,
}

impl KeyContext {
    /// Creates a context for `key` with the captured `params`.
    pub fn new(key: impl Into<SmolStr>, params: KeyParams) -> Self {
        Self {
            inner: Arc::new(KeyContextInner {
                key: key.into(),
                params,
            }),
        }
    }

    /// Creates a context for a key that matched a pattern without placeholders.
    pub fn literal(key: impl Into<SmolStr>) -> Self {
        Self::new(key, KeyParams::new())
    }

    /// The full key the operation was invoked with.
    #[inline]
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    /// All captured placeholder values.
    #[inline]
    pub fn params(&self) -> &KeyParams {
        &self.inner.params
    }

    /// Shortcut for `self.params().get(name)`.
    #[inline]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.inner.params.get(name)
    }
}

impl fmt::Debug for KeyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyContext")
            .field("key", &self.inner.key)
            .field("params", &self.inner.params)
            .finish()
    }
}

impl fmt::Display for KeyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.key)
    }
}

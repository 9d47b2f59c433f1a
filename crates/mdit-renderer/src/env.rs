//! Per-call render environment.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// Values scoped to a single render call.
///
/// The environment is owned by the caller and passed by reference into
/// [`MarkdownRenderer::render`](crate::MarkdownRenderer::render). Plugins
/// look up entries under documented keys (for example `"stylize"` for
/// per-call stylize rules) and downcast them to the type they expect.
/// A missing key, or a value of an unexpected type, reads as absent.
#[derive(Default)]
pub struct RenderEnv {
    values: HashMap<String, Box<dyn Any>>,
}

impl RenderEnv {
    /// Create an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value under `key`, replacing any previous value.
    #[must_use]
    pub fn with<T: Any>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value under `key`, replacing any previous value.
    pub fn insert<T: Any>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Box::new(value));
    }

    /// Get the value under `key` if it exists and has type `T`.
    #[must_use]
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key)?.downcast_ref()
    }

    /// Check whether any value is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Remove the value under `key`. Returns `true` if a value was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    /// Check whether the environment holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for RenderEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("RenderEnv").field("keys", &keys).finish()
    }
}

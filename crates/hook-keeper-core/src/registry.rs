//! Event registry mapping event keys to handlers.
//!
//! [`EventRegistry`] is built by the process entry point before the server
//! starts and shared with the HTTP layer through an `Arc`. Lookups take a
//! shared lock, registrations an exclusive one, so late registration is safe
//! while requests are in flight.

use crate::{event_kind::EventKind, handler::EventHandler};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::debug;

/// A registry hit: the schema to decode with and the handler to invoke.
#[derive(Clone)]
pub struct Registration {
    /// Selects the payload schema
    pub kind: EventKind,

    /// Handler bound to the key
    pub handler: Arc<dyn EventHandler>,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Registry mapping event keys to their handlers.
///
/// Keys are matched verbatim. Registering a key twice replaces the earlier
/// handler; bindings never accumulate.
///
/// # Examples
///
/// ```rust
/// use hook_keeper_core::{BitbucketEvent, EventKind, EventRegistry, HandlerError, Headers};
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let registry = EventRegistry::new();
/// registry
///     .register(
///         EventKind::RepoPush,
///         Arc::new(|_: &Headers, _: &BitbucketEvent| -> Result<(), HandlerError> { Ok(()) }),
///     )
///     .await;
///
/// assert!(registry.lookup("repo:push").await.is_some());
/// assert!(registry.lookup("bogus:key").await.is_none());
/// # });
/// ```
#[derive(Default)]
pub struct EventRegistry {
    handlers: RwLock<HashMap<String, Registration>>,
}

impl EventRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to the key of `kind`.
    ///
    /// If the key is already bound, the previous handler is replaced and
    /// returned.
    pub async fn register(
        &self,
        kind: EventKind,
        handler: Arc<dyn EventHandler>,
    ) -> Option<Arc<dyn EventHandler>> {
        let previous = self
            .handlers
            .write()
            .await
            .insert(kind.as_str().to_string(), Registration { kind, handler });

        debug!(
            event_key = %kind,
            replaced = previous.is_some(),
            "Registered event handler"
        );

        previous.map(|r| r.handler)
    }

    /// Bind one handler to several keys.
    pub async fn register_all<I>(&self, kinds: I, handler: Arc<dyn EventHandler>)
    where
        I: IntoIterator<Item = EventKind>,
    {
        for kind in kinds {
            self.register(kind, Arc::clone(&handler)).await;
        }
    }

    /// Look up the binding for an event key.
    ///
    /// Returns `None` when nothing is bound to the key, including keys
    /// outside the known taxonomy. The returned value is a snapshot; no lock
    /// is held after this call returns.
    pub async fn lookup(&self, key: &str) -> Option<Registration> {
        self.handlers.read().await.get(key).cloned()
    }

    /// Check whether a key is bound.
    pub async fn contains(&self, key: &str) -> bool {
        self.handlers.read().await.contains_key(key)
    }

    /// Number of bound keys.
    pub async fn len(&self) -> usize {
        self.handlers.read().await.len()
    }

    /// Whether no key is bound.
    pub async fn is_empty(&self) -> bool {
        self.handlers.read().await.is_empty()
    }

    /// Bound keys, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.handlers.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;

//! Scoped listener registration for raw event sources.
//!
//! A [`Subscription`] releases its listener when dropped or disposed. Once
//! released, the listener never runs again, including from an emit that
//! started before the release.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

pub type Listener<E> = Box<dyn Fn(&E) + Send + Sync>;

/// Something that raw events can be subscribed to.
pub trait RawEventSource<E>: Send + Sync {
    fn subscribe(&self, listener: Listener<E>) -> Subscription;
}

/// Guard for one registered listener.
#[must_use = "dropping a Subscription releases the listener immediately"]
pub struct Subscription {
    disposer: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(disposer: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            disposer: Some(Box::new(disposer)),
        }
    }

    /// A subscription with nothing to release.
    pub fn noop() -> Self {
        Self { disposer: None }
    }

    pub fn is_active(&self) -> bool {
        self.disposer.is_some()
    }

    /// Release the listener. Idempotent.
    pub fn dispose(&mut self) {
        if let Some(disposer) = self.disposer.take() {
            disposer();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

struct Entry<E> {
    active: Arc<AtomicBool>,
    listener: Arc<Listener<E>>,
}

struct Registry<E> {
    next_id: AtomicU64,
    entries: Mutex<BTreeMap<u64, Entry<E>>>,
}

/// In-process event source: listeners run synchronously, in subscription
/// order, on the thread that calls [`EventHub::emit`].
pub struct EventHub<E> {
    registry: Arc<Registry<E>>,
}

impl<E> Default for EventHub<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventHub<E> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry {
                next_id: AtomicU64::new(0),
                entries: Mutex::new(BTreeMap::new()),
            }),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Deliver `event` to every active listener. Returns how many ran.
    pub fn emit(&self, event: &E) -> usize {
        // Snapshot so listeners may subscribe or dispose while running.
        let snapshot: Vec<(Arc<AtomicBool>, Arc<Listener<E>>)> = self
            .registry
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|e| (Arc::clone(&e.active), Arc::clone(&e.listener)))
            .collect();

        let mut delivered = 0;
        for (active, listener) in snapshot {
            if active.load(Ordering::Acquire) {
                listener(event);
                delivered += 1;
            }
        }
        delivered
    }
}

impl<E: 'static> RawEventSource<E> for EventHub<E> {
    fn subscribe(&self, listener: Listener<E>) -> Subscription {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        let active = Arc::new(AtomicBool::new(true));
        self.registry
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id,
                Entry {
                    active: Arc::clone(&active),
                    listener: Arc::new(listener),
                },
            );

        let registry: Weak<Registry<E>> = Arc::downgrade(&self.registry);
        Subscription::new(move || {
            active.store(false, Ordering::Release);
            if let Some(registry) = registry.upgrade() {
                registry
                    .entries
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&id);
            }
        })
    }
}

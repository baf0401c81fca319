//! Observable state containers.
//!
//! # Architecture
//!
//! [`Store<S>`] holds one snapshot of `S` and a registry of listeners. Every
//! transition derives the complete next state from the previous one, swaps it
//! in, and then synchronously calls every live listener (in registration
//! order) before the mutating call returns.
//!
//! The two application containers wrap a store and expose only their named
//! mutators:
//!
//! - [`AuthStore`] - current user and authenticated flag (not persisted)
//! - [`CartStore`] - cart line items (persisted under `cart-storage`)
//!
//! Handles are cheaply cloneable via `Arc`; clones observe the same state.
//! Transitions are serialized: derive, notify and any post-transition hook of
//! one transition finish before the next one starts, so listeners and
//! persistence observe transitions in the order they were applied. Listeners
//! run after the state lock is released, so a listener may read the store or
//! register further listeners, but must not mutate the store it observes.

pub mod auth;
pub mod cart;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

pub use auth::{AuthState, AuthStore};
pub use cart::{CART_STORAGE_KEY, CartItem, CartState, CartStore};

type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// A state container with change notification.
pub struct Store<S> {
    inner: Arc<StoreInner<S>>,
}

struct StoreInner<S> {
    transition: Mutex<()>,
    state: Mutex<S>,
    listeners: Mutex<Listeners<S>>,
}

struct Listeners<S> {
    next_id: u64,
    entries: Vec<(u64, Listener<S>)>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &*lock(&self.inner.state))
            .field("listeners", &lock(&self.inner.listeners).entries.len())
            .finish()
    }
}

impl<S: Clone + Send + 'static> Store<S> {
    /// Create a store holding `initial`.
    #[must_use]
    pub fn new(initial: S) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                transition: Mutex::new(()),
                state: Mutex::new(initial),
                listeners: Mutex::new(Listeners {
                    next_id: 0,
                    entries: Vec::new(),
                }),
            }),
        }
    }

    /// Clone of the current snapshot.
    #[must_use]
    pub fn get(&self) -> S {
        lock(&self.inner.state).clone()
    }

    /// Borrow the current snapshot without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&lock(&self.inner.state))
    }

    /// Replace the state with the one derived from the current snapshot, then
    /// notify every listener. Returns the new snapshot.
    pub(crate) fn update(&self, derive: impl FnOnce(&S) -> S) -> S {
        self.update_then(derive, |_| ())
    }

    /// Like [`Store::update`], then run `after` with the new snapshot before
    /// any other transition can start.
    pub(crate) fn update_then(
        &self,
        derive: impl FnOnce(&S) -> S,
        after: impl FnOnce(&S),
    ) -> S {
        let _transition = lock(&self.inner.transition);
        let next = {
            let mut state = lock(&self.inner.state);
            let next = derive(&state);
            state.clone_from(&next);
            next
        };
        self.notify(&next);
        after(&next);
        next
    }

    /// Register `listener` for every future transition.
    ///
    /// The listener is not called with the current state; use
    /// [`crate::bridge::sync_store`] for the "now and on change" contract.
    pub fn subscribe(&self, listener: impl Fn(&S) + Send + Sync + 'static) -> Subscription {
        let id = {
            let mut listeners = lock(&self.inner.listeners);
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, Arc::new(listener)));
            id
        };

        let weak: Weak<StoreInner<S>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                lock(&inner.listeners)
                    .entries
                    .retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Number of live listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        lock(&self.inner.listeners).entries.len()
    }

    fn notify(&self, state: &S) {
        // Snapshot the registry so listeners can (un)subscribe while running.
        let listeners: Vec<Listener<S>> = lock(&self.inner.listeners)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(state);
        }
    }
}

/// Handle returned by [`Store::subscribe`].
///
/// Dropping the handle (or calling [`Subscription::unsubscribe`]) removes the
/// listener. Removal happens at most once.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Remove the listener now.
    pub fn unsubscribe(mut self) {
        self.release_once();
    }

    /// Whether the listener is still registered through this handle.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.release.is_some()
    }

    fn release_once(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_once();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Lock a mutex, recovering the data if a listener panicked while holding it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

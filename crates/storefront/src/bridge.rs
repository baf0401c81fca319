//! Bridge between state containers and UI components.
//!
//! A component calls [`sync_store`] with a callback that copies the container
//! state into its own reactive fields. The callback runs once immediately and
//! again after every transition. The returned [`Subscription`] is the
//! component's teardown hook: dropping it deregisters the callback.
//!
//! Components that observe several containers collect their subscriptions in
//! a [`Scope`], which releases all of them when the component is torn down.
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use shopfront_storefront::bridge::Scope;
//! use shopfront_storefront::stores::AuthStore;
//!
//! let auth = AuthStore::new();
//! let signed_in = Arc::new(Mutex::new(false));
//!
//! let mut scope = Scope::new();
//! let view = Arc::clone(&signed_in);
//! scope.sync(&auth, move |state| {
//!     *view.lock().unwrap() = state.is_authenticated();
//! });
//!
//! scope.teardown();
//! ```

use tracing::trace;

use crate::stores::{Store, Subscription};

/// A container that exposes snapshots and change notifications.
pub trait StateContainer {
    /// Snapshot type handed to listeners.
    type State: Clone;

    /// Current snapshot.
    fn snapshot(&self) -> Self::State;

    /// Register `listener` for every future transition.
    fn subscribe(&self, listener: impl Fn(&Self::State) + Send + Sync + 'static)
    -> Subscription;
}

impl<S: Clone + Send + 'static> StateContainer for Store<S> {
    type State = S;

    fn snapshot(&self) -> S {
        self.get()
    }

    fn subscribe(&self, listener: impl Fn(&S) + Send + Sync + 'static) -> Subscription {
        Self::subscribe(self, listener)
    }
}

/// Call `callback` with the current state now and after every transition.
///
/// Dropping the returned subscription stops further calls.
pub fn sync_store<C, F>(container: &C, callback: F) -> Subscription
where
    C: StateContainer + ?Sized,
    F: Fn(&C::State) + Send + Sync + 'static,
{
    callback(&container.snapshot());
    container.subscribe(callback)
}

/// Lifetime of a UI component.
///
/// Every subscription made through [`Scope::sync`] is released when the scope
/// is torn down or dropped, exactly once.
#[derive(Debug, Default)]
pub struct Scope {
    subscriptions: Vec<Subscription>,
}

impl Scope {
    /// An empty scope.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
        }
    }

    /// [`sync_store`] tied to this scope.
    pub fn sync<C, F>(&mut self, container: &C, callback: F)
    where
        C: StateContainer + ?Sized,
        F: Fn(&C::State) + Send + Sync + 'static,
    {
        self.subscriptions.push(sync_store(container, callback));
    }

    /// Number of live subscriptions held by this scope.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether the scope holds no subscriptions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release every subscription. Further teardowns do nothing.
    pub fn teardown(&mut self) {
        if !self.subscriptions.is_empty() {
            trace!(count = self.subscriptions.len(), "Releasing component subscriptions");
        }
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.teardown();
    }
}

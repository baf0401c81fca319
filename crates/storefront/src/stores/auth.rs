//! Authentication state container.
//!
//! Not persisted: each process start re-derives the session through
//! [`crate::loaders::LayoutLoader`], so a stale identity never survives a
//! reload.

use shopfront_core::User;
use tracing::{debug, info};

use super::{Store, Subscription};
use crate::bridge::StateContainer;
use crate::error::{clear_sentry_user, set_sentry_user};

/// Snapshot of the authentication state.
///
/// `is_authenticated()` is true exactly when a user is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    user: Option<User>,
}

impl AuthState {
    /// The logged-out state.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { user: None }
    }

    /// The logged-in state for `user`.
    #[must_use]
    pub const fn authenticated(user: User) -> Self {
        Self { user: Some(user) }
    }

    /// The current user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Whether a user is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Container for the current session identity.
#[derive(Debug, Clone)]
pub struct AuthStore {
    store: Store<AuthState>,
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthStore {
    /// Create a logged-out container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Store::new(AuthState::anonymous()),
        }
    }

    /// Mark `user` as logged in, replacing any previous user.
    ///
    /// The caller is trusted; no validation is performed.
    pub fn login(&self, user: User) {
        info!(user_id = %user.id, "User logged in");
        set_sentry_user(&user.id, Some(user.email.as_str()));
        self.store.update(move |_| AuthState::authenticated(user));
    }

    /// Clear the current user.
    pub fn logout(&self) {
        debug!("User logged out");
        clear_sentry_user();
        self.store.update(|_| AuthState::anonymous());
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.store.get()
    }

    /// Current user, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.store.read(|state| state.user.clone())
    }

    /// Whether a user is logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store.read(AuthState::is_authenticated)
    }
}

impl StateContainer for AuthStore {
    type State = AuthState;

    fn snapshot(&self) -> AuthState {
        self.store.get()
    }

    fn subscribe(&self, listener: impl Fn(&AuthState) + Send + Sync + 'static) -> Subscription {
        self.store.subscribe(listener)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use shopfront_core::UserId;

    use super::*;

    fn user(id: &str) -> User {
        User {
            id: UserId::new(id),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[test]
    fn test_starts_logged_out() {
        let auth = AuthStore::new();
        let state = auth.snapshot();
        assert!(state.user().is_none());
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_login_sets_user_and_flag() {
        let auth = AuthStore::new();
        auth.login(user("u1"));

        let state = auth.snapshot();
        assert_eq!(state.user(), Some(&user("u1")));
        assert!(state.is_authenticated());
        assert!(auth.is_authenticated());
    }

    #[test]
    fn test_login_replaces_previous_user() {
        let auth = AuthStore::new();
        auth.login(user("u1"));
        auth.login(user("u2"));
        assert_eq!(auth.user().unwrap().id, UserId::new("u2"));
    }

    #[test]
    fn test_logout_clears_user_and_flag() {
        let auth = AuthStore::new();
        auth.login(user("u1"));
        auth.logout();

        assert_eq!(auth.snapshot(), AuthState::anonymous());
        assert!(auth.user().is_none());
    }

    #[test]
    fn test_logout_when_anonymous_is_total() {
        let auth = AuthStore::new();
        auth.logout();
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn test_flag_always_tracks_user() {
        let auth = AuthStore::new();
        let violations = Arc::new(Mutex::new(0_u32));
        let sink = Arc::clone(&violations);
        let _sub = StateContainer::subscribe(&auth, move |state: &AuthState| {
            if state.is_authenticated() != state.user().is_some() {
                *sink.lock().unwrap() += 1;
            }
        });

        auth.login(user("u1"));
        auth.logout();
        auth.login(user("u2"));

        assert_eq!(*violations.lock().unwrap(), 0);
    }
}

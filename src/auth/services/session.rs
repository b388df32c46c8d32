//! Process-wide session state mirrored to durable storage.

use crate::auth::domain::{AccessToken, Session, UserProfile};
use crate::auth::ports::SessionStore;
use std::sync::{Arc, PoisonError, RwLock};

/// Canonical storage key for the access token.
const TOKEN_KEY: &str = "token";

/// Canonical storage key for the serialised user profile.
const USER_KEY: &str = "user";

/// Role prefixes of the retired per-role storage keys.
const LEGACY_ROLES: [&str; 4] = ["admin", "hr", "manager", "employee"];

/// Shared session cell with a durable mirror.
///
/// The in-memory value is authoritative for reads; every mutation is
/// mirrored synchronously to the [`SessionStore`] and teardown clears both.
/// The refresh leader is the only writer during a refresh cycle.
pub struct SessionHandle<S: SessionStore> {
    store: Arc<S>,
    current: Arc<RwLock<Option<Session>>>,
}

impl<S: SessionStore> Clone for SessionHandle<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            current: Arc::clone(&self.current),
        }
    }
}

impl<S: SessionStore> SessionHandle<S> {
    /// Loads session state from the store, migrating legacy role-prefixed
    /// keys (`admin_token`, `hr_token`, ...) into the canonical keys first.
    #[must_use]
    pub fn load(store: Arc<S>) -> Self {
        migrate_legacy_keys(&*store);
        let current = read_session(&*store);
        Self {
            store,
            current: Arc::new(RwLock::new(current)),
        }
    }

    /// Replaces the session after login, register, or refresh success.
    pub fn establish(&self, session: Session) {
        self.store.set(TOKEN_KEY, session.access_token.as_str());
        match serde_json::to_string(&session.user) {
            Ok(serialised) => self.store.set(USER_KEY, &serialised),
            Err(err) => tracing::warn!(error = %err, "failed to mirror user profile to storage"),
        }
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    /// Swaps in a freshly minted access token, keeping the user profile.
    ///
    /// A no-op when no session is held (the refresh outcome arrived after a
    /// teardown).
    pub fn replace_token(&self, token: AccessToken) {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(session) = guard.as_mut() {
            self.store.set(TOKEN_KEY, token.as_str());
            session.access_token = token;
        }
    }

    /// Tears the session down in memory and storage.
    pub fn clear(&self) {
        self.store.remove(TOKEN_KEY);
        self.store.remove(USER_KEY);
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Returns the held access token, if any.
    #[must_use]
    pub fn access_token(&self) -> Option<AccessToken> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    /// Returns a copy of the current session, if any.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns true iff both a token and a user profile are held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

/// Moves legacy role-prefixed keys into the canonical keys, then removes
/// them. The first legacy pair found wins when no canonical token exists.
fn migrate_legacy_keys(store: &impl SessionStore) {
    for role in LEGACY_ROLES {
        let token_key = format!("{role}_token");
        let user_key = format!("{role}_user");
        if store.get(TOKEN_KEY).is_none() {
            if let Some(token) = store.get(&token_key) {
                store.set(TOKEN_KEY, &token);
                if let Some(user) = store.get(&user_key) {
                    store.set(USER_KEY, &user);
                }
                tracing::debug!(role, "migrated legacy session keys");
            }
        }
        store.remove(&token_key);
        store.remove(&user_key);
    }
}

/// Reads a complete session from storage; partial or malformed state is
/// treated as unauthenticated and cleaned up.
fn read_session(store: &impl SessionStore) -> Option<Session> {
    let token = store.get(TOKEN_KEY)?;
    let Some(user_json) = store.get(USER_KEY) else {
        store.remove(TOKEN_KEY);
        return None;
    };
    match serde_json::from_str::<UserProfile>(&user_json) {
        Ok(user) => Some(Session::new(AccessToken::new(token), user)),
        Err(err) => {
            tracing::warn!(error = %err, "stored user profile is malformed; discarding session");
            store.remove(TOKEN_KEY);
            store.remove(USER_KEY);
            None
        }
    }
}

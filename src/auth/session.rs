//! Server-side session state.
//!
//! Sessions map an opaque token, carried by the client in a cookie, to the
//! authenticated user id. The mapping lives entirely on the server; the
//! client only ever sees the token. There is no expiry: a session lasts
//! until logout clears it.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

/// Name of the cookie that carries the session token.
pub const SESSION_COOKIE: &str = "session";

#[derive(Clone, Default)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Uuid>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh opaque token. The token is not live until [`set`] binds
    /// it to a user.
    ///
    /// [`set`]: SessionManager::set
    pub fn create(&self) -> String {
        Uuid::new_v4().to_string()
    }

    /// Bind `token` to `user_id`. Rebinding an existing token is
    /// last-writer-wins.
    pub fn set(&self, token: &str, user_id: Uuid) {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.insert(token.to_string(), user_id);
    }

    /// Resolve a token to its user id, if the session is live.
    pub fn get(&self, token: &str) -> Option<Uuid> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions.get(token).copied()
    }

    /// End a session. Returns whether the token was live.
    pub fn clear(&self, token: &str) -> bool {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.remove(token).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_and_inert_until_set() {
        let sessions = SessionManager::new();
        let a = sessions.create();
        let b = sessions.create();
        assert_ne!(a, b);
        assert!(sessions.get(&a).is_none());
    }

    #[test]
    fn set_get_clear_roundtrip() {
        let sessions = SessionManager::new();
        let token = sessions.create();
        let user_id = Uuid::new_v4();

        sessions.set(&token, user_id);
        assert_eq!(sessions.get(&token), Some(user_id));

        assert!(sessions.clear(&token));
        assert!(sessions.get(&token).is_none());
        assert!(!sessions.clear(&token));
    }

    #[test]
    fn rebinding_a_token_is_last_writer_wins() {
        let sessions = SessionManager::new();
        let token = sessions.create();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        sessions.set(&token, first);
        sessions.set(&token, second);
        assert_eq!(sessions.get(&token), Some(second));
    }

    #[test]
    fn clones_share_state() {
        let sessions = SessionManager::new();
        let handle = sessions.clone();
        let token = sessions.create();
        sessions.set(&token, Uuid::new_v4());
        assert!(handle.get(&token).is_some());
    }
}

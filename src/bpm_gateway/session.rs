use std::{
    collections::HashMap,
    sync::RwLock,
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque handle a caller presents on every call; sessions are keyed by it so
/// concurrent callers never observe each other's tokens.
pub type SessionScope = String;

pub fn new_session_scope() -> SessionScope {
    Uuid::now_v7().to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthSession {
    pub username: String,
    /// Engine session id, re-sent as the JSESSIONID cookie.
    pub session_token: String,
    /// Anti-CSRF token; writes require it as its own header, not only in the cookie.
    pub api_token: String,
    /// The caller's user id inside the engine, resolved once at login.
    pub user_id: String,
    pub acquired_at_millis: u64,
}

impl AuthSession {
    pub fn has_both_tokens(&self) -> bool {
        !self.session_token.is_empty() && !self.api_token.is_empty()
    }
}

pub fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

pub trait SessionStore: Send + Sync {
    fn set(&self, scope: &str, session: AuthSession);
    fn get(&self, scope: &str) -> Option<AuthSession>;
    fn clear(&self, scope: &str);
}

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionScope, AuthSession>>,
}

impl SessionStore for InMemorySessionStore {
    fn set(&self, scope: &str, session: AuthSession) {
        self.sessions
            .write()
            .expect("session store lock poisoned")
            .insert(scope.to_string(), session);
    }

    fn get(&self, scope: &str) -> Option<AuthSession> {
        self.sessions
            .read()
            .expect("session store lock poisoned")
            .get(scope)
            .cloned()
    }

    fn clear(&self, scope: &str) {
        self.sessions
            .write()
            .expect("session store lock poisoned")
            .remove(scope);
    }
}

// src/services/session_manager.rs
use std::{
    collections::HashMap,
    fmt::Debug,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::message::Turn;
use crate::services::relay::Exchange;

#[derive(Clone, Debug)]
pub struct Session {
    pub id: String,
    pub turns: Vec<Turn>,
    pub last_active: Instant,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), turns: Vec::new(), last_active: Instant::now() }
    }
}

/// Server-side conversation store keyed by session id. Histories are
/// bounded: once a session exceeds `history_limit` turns the oldest turns
/// are dropped. Sessions idle past `ttl` are reclaimed by `purge_expired`.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
    history_limit: usize,
}

impl Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl", &self.ttl)
            .field("history_limit", &self.history_limit)
            .finish()
    }
}

impl SessionManager {
    pub fn new(ttl: Duration, history_limit: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            history_limit,
        }
    }

    // Create a fresh session and return its id.
    pub async fn create_session(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let session = Session::new(id.clone());

        let mut guard = self.inner.write().await;
        guard.insert(id.clone(), session);
        id
    }

    // Ensure there's a session with this id. A purged or never-seen id
    // gets an empty session, so clients keep a stable id across restarts.
    pub async fn ensure_session(&self, id: &str) -> String {
        {
            let guard = self.inner.read().await;
            if guard.contains_key(id) {
                return id.to_string();
            }
        }
        let mut guard = self.inner.write().await;
        let session = Session::new(id.to_string());
        guard.insert(id.to_string(), session);
        id.to_string()
    }

    /// Append one completed round to a session's history and touch
    /// last_active. Both turns land under a single write lock so
    /// concurrent rounds never interleave inside a pair.
    pub async fn append_exchange(&self, session_id: &str, exchange: &Exchange) -> usize {
        let mut guard = self.inner.write().await;
        let entry = guard
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id.to_string()));
        entry.turns.push(exchange.user.clone());
        entry.turns.push(exchange.assistant.clone());
        if entry.turns.len() > self.history_limit {
            let excess = entry.turns.len() - self.history_limit;
            entry.turns.drain(..excess);
        }
        entry.last_active = Instant::now();
        entry.turns.len()
    }

    /// Get a copy of the session history
    pub async fn history(&self, session_id: &str) -> Option<Vec<Turn>> {
        let guard = self.inner.read().await;
        guard.get(session_id).map(|s| s.turns.clone())
    }

    /// Remove a session by id
    pub async fn remove_session(&self, session_id: &str) -> bool {
        let mut guard = self.inner.write().await;
        guard.remove(session_id).is_some()
    }

    /// Remove sessions idle longer than ttl. Returns number removed.
    pub async fn purge_expired(&self) -> usize {
        let mut guard = self.inner.write().await;
        let now = Instant::now();
        let before = guard.len();
        guard.retain(|_, s| now.duration_since(s.last_active) < self.ttl);
        before - guard.len()
    }

    /// Number of sessions
    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }
}

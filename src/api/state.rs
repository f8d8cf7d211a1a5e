use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::middleware::SessionId;
use crate::services::{Library, Session, WeatherProvider};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub library: Arc<Library>,
    pub provider: Arc<dyn WeatherProvider>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(library: Library, provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            library: Arc::new(library),
            provider,
            sessions: SessionStore::default(),
        }
    }

    pub fn with_session_capacity(mut self, capacity: usize) -> Self {
        self.sessions = SessionStore::with_capacity(capacity);
        self
    }
}

/// Sessions kept before the least recently used one is evicted
pub const DEFAULT_SESSION_CAPACITY: usize = 10_000;

struct SessionEntry {
    session: Session,
    last_seen: Instant,
}

/// In-memory recommendation history, keyed by session ID
///
/// A session is only stored once something has been recommended to it.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<SessionId, SessionEntry>>>,
    capacity: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_SESSION_CAPACITY)
    }
}

impl SessionStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Runs `f` against the session
    ///
    /// Unknown IDs get a fresh session that is kept only if `f` leaves it
    /// non-empty. `f` runs while the store is locked, so it must not block.
    pub async fn with_session<T>(&self, id: SessionId, f: impl FnOnce(&mut Session) -> T) -> T {
        let mut inner = self.inner.write().await;

        if let Some(entry) = inner.get_mut(&id) {
            entry.last_seen = Instant::now();
            return f(&mut entry.session);
        }

        let mut session = Session::default();
        let result = f(&mut session);
        if session.is_empty() {
            return result;
        }

        if inner.len() >= self.capacity {
            let oldest = inner
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id);
            if let Some(oldest) = oldest {
                inner.remove(&oldest);
                tracing::debug!(session_id = %oldest, "Evicted least recently used session");
            }
        }

        inner.insert(
            id,
            SessionEntry {
                session,
                last_seen: Instant::now(),
            },
        );
        result
    }

    /// Drops sessions idle for longer than `max_idle`, returning how many were removed
    pub async fn prune_idle(&self, max_idle: Duration) -> usize {
        let mut inner = self.inner.write().await;
        let before = inner.len();
        inner.retain(|_, entry| entry.last_seen.elapsed() <= max_idle);
        before - inner.len()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

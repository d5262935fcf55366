use super::model::{Session, SessionConfig};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Shared handle to a single session record.
///
/// Locking the handle serializes every mutation of that session; the registry
/// lock is never held while a handle is locked.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Keyed registry of interview sessions.
///
/// `SessionStore` is responsible for:
/// - Creating sessions with fresh ids
/// - Looking sessions up (snapshot or lockable handle)
/// - Deleting sessions
/// - Evicting sessions that have been idle too long
///
/// Registry changes (`create`, `delete`, eviction) take the store-wide write
/// lock; per-session mutation goes through the session's own mutex.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session and returns its id.
    pub async fn create(&self, config: SessionConfig) -> String {
        let mut sessions = self.sessions.write().await;
        let id = loop {
            let candidate = generate_session_id();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        let session = Session::new(id.clone(), config);
        sessions.insert(id.clone(), Arc::new(Mutex::new(session)));
        debug!(session_id = %id, "session created");
        id
    }

    /// Returns a copy of the session, or `None` if it does not exist.
    ///
    /// The copy is taken under the session's lock. An idle session is read
    /// without waiting. While a turn is in flight this waits for the turn to
    /// finish, which can take as long as the collaborator timeout; the copy
    /// never shows a half-applied turn.
    pub async fn get(&self, session_id: &str) -> Option<Session> {
        let handle = self.handle(session_id).await?;
        let session = match handle.try_lock() {
            Ok(session) => session.clone(),
            Err(_) => handle.lock().await.clone(),
        };
        Some(session)
    }

    /// Returns the lockable handle for in-place mutation.
    pub async fn handle(&self, session_id: &str) -> Option<SessionHandle> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }

    /// Removes the session. Returns whether it existed.
    pub async fn delete(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(session_id).is_some();
        if removed {
            debug!(session_id, "session deleted");
        }
        removed
    }

    pub async fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Removes sessions whose last activity is older than `ttl`.
    ///
    /// Sessions that are mid-turn (their lock is held) are skipped; they are
    /// active by definition. Returns the number of evicted sessions.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let cutoff = match chrono::Duration::from_std(ttl) {
            Ok(ttl) => Utc::now() - ttl,
            Err(_) => return 0,
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => session.last_activity >= cutoff,
            Err(_) => true,
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, "idle sessions evicted");
        }
        evicted
    }
}

/// 32 random bits from a v4 UUID, rendered as 8 hex characters.
fn generate_session_id() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    hex[hex.len() - 8..].to_string()
}

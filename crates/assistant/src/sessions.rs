//! In-memory registry of live chat sessions.
//!
//! Sessions are keyed by id and expire after the configured idle time,
//! the same way an abandoned chat widget would be forgotten. Each entry
//! is behind its own async mutex: handlers lock a session with
//! `try_lock`, so a message that arrives while the previous one is
//! still processing gets a busy answer instead of racing it.

use std::sync::Arc;
use std::time::Duration;

use forneria_core::{DeviceId, SessionId};
use moka::future::Cache;
use tokio::sync::Mutex;

use crate::models::ChatSession;

/// Upper bound on concurrently tracked sessions.
const MAX_SESSIONS: u64 = 10_000;

pub type SharedSession = Arc<Mutex<ChatSession>>;

#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Cache<SessionId, SharedSession>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new(idle_timeout: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(MAX_SESSIONS)
            .time_to_idle(idle_timeout)
            .build();

        Self { sessions }
    }

    /// Creates and registers a session for a device.
    pub async fn create(&self, device: DeviceId) -> SharedSession {
        let session = ChatSession::new(device);
        let id = session.id;
        let shared = Arc::new(Mutex::new(session));

        self.sessions.insert(id, Arc::clone(&shared)).await;
        shared
    }

    /// Fetches a live session, refreshing its idle timer.
    pub async fn get(&self, id: SessionId) -> Option<SharedSession> {
        self.sessions.get(&id).await
    }

    pub async fn remove(&self, id: SessionId) {
        self.sessions.invalidate(&id).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_created_sessions_can_be_fetched() {
        let registry = SessionRegistry::new(Duration::from_secs(1800));

        let shared = registry.create(DeviceId::generate()).await;
        let id = shared.lock().await.id;

        let fetched = registry.get(id).await.unwrap();
        assert_eq!(fetched.lock().await.id, id);
    }

    #[tokio::test]
    async fn test_unknown_session_is_none() {
        let registry = SessionRegistry::new(Duration::from_secs(1800));

        assert!(registry.get(SessionId::new()).await.is_none());
    }

    #[tokio::test]
    async fn test_removed_sessions_are_gone() {
        let registry = SessionRegistry::new(Duration::from_secs(1800));

        let shared = registry.create(DeviceId::generate()).await;
        let id = shared.lock().await.id;

        registry.remove(id).await;
        assert!(registry.get(id).await.is_none());
    }

    #[tokio::test]
    async fn test_locked_session_reports_busy() {
        let registry = SessionRegistry::new(Duration::from_secs(1800));

        let shared = registry.create(DeviceId::generate()).await;
        let guard = shared.lock().await;

        assert!(shared.try_lock().is_err());
        drop(guard);
        assert!(shared.try_lock().is_ok());
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let registry = SessionRegistry::new(Duration::from_millis(50));

        let shared = registry.create(DeviceId::generate()).await;
        let id = shared.lock().await.id;

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(registry.get(id).await.is_none());
    }
}

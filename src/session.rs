//! Per-browser panel sessions.
//!
//! Each connected browser gets its own [`AdminPanel`] behind a mutex, keyed
//! by a random cookie id. The registry sweeps idle sessions in a background
//! task; losing a session just means the next request starts a fresh panel.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::distr::Alphanumeric;
use rand::Rng;
use tokio::sync::{Mutex, RwLock};

use crate::panel::AdminPanel;

/// One browser's panel plus its idle clock.
pub struct PanelSession {
    pub panel: Mutex<AdminPanel>,
    last_seen: Mutex<Instant>,
}

impl PanelSession {
    fn new(panel: AdminPanel) -> Self {
        Self {
            panel: Mutex::new(panel),
            last_seen: Mutex::new(Instant::now()),
        }
    }

    async fn touch(&self) {
        *self.last_seen.lock().await = Instant::now();
    }

    async fn idle(&self) -> Duration {
        self.last_seen.lock().await.elapsed()
    }
}

/// Registry of live panel sessions.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<PanelSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Generate a cryptographically random session id.
    fn generate_session_id() -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(64)
            .map(char::from)
            .collect()
    }

    /// Look up a session by id, refreshing its idle clock.
    pub async fn get(&self, session_id: &str) -> Option<Arc<PanelSession>> {
        let session = {
            let sessions = self.sessions.read().await;
            sessions.get(session_id).cloned()
        }?;

        session.touch().await;
        Some(session)
    }

    /// Register a fresh panel and return its id.
    pub async fn create(&self, panel: AdminPanel) -> (String, Arc<PanelSession>) {
        let session_id = Self::generate_session_id();
        let session = Arc::new(PanelSession::new(panel));

        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id.clone(), session.clone());

        (session_id, session)
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Remove sessions idle for longer than `timeout`. Returns removed ids.
    pub async fn remove_stale(&self, timeout: Duration) -> Vec<String> {
        let mut stale = Vec::new();
        {
            let sessions = self.sessions.read().await;
            for (id, session) in sessions.iter() {
                if session.idle().await > timeout {
                    stale.push(id.clone());
                }
            }
        }

        if !stale.is_empty() {
            let mut sessions = self.sessions.write().await;
            for id in &stale {
                sessions.remove(id);
            }
        }

        stale
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

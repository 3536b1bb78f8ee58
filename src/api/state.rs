use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::Destination,
    services::{ChatCompletionProvider, CompletionProvider},
};

/// Idle time after which a session may be evicted
pub const DEFAULT_SESSION_TTL_SECS: i64 = 3600;
/// Upper bound on sessions held in memory
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn CompletionProvider>,
    pub sessions: Arc<RwLock<HashMap<Uuid, Arc<Session>>>>,
    session_ttl: Duration,
    max_sessions: usize,
}

impl AppState {
    /// Creates state around the given completion provider with no sessions
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            session_ttl: Duration::seconds(DEFAULT_SESSION_TTL_SECS),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    /// Overrides the idle TTL and the session cap
    pub fn with_session_limits(mut self, ttl: Duration, max_sessions: usize) -> Self {
        self.session_ttl = ttl;
        self.max_sessions = max_sessions.max(1);
        self
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        let provider = ChatCompletionProvider::from_config(config)?;
        Ok(Self::new(Arc::new(provider)).with_session_limits(
            Duration::seconds(config.session_ttl_secs),
            config.max_sessions,
        ))
    }

    /// Registers a new, empty session
    ///
    /// Sessions idle past the TTL are dropped first. If the store is still full,
    /// the least recently active sessions make room.
    pub async fn create_session(&self) -> Arc<Session> {
        let session = Arc::new(Session::new());
        let mut sessions = self.sessions.write().await;

        let expired = prune_idle(&mut sessions, self.session_ttl, Utc::now());
        let evicted = evict_oldest(&mut sessions, self.max_sessions - 1);
        if expired + evicted > 0 {
            tracing::debug!(expired, evicted, remaining = sessions.len(), "Sessions evicted");
        }

        sessions.insert(session.id, session.clone());
        session
    }

    /// Looks up a session and marks it active
    pub async fn session(&self, id: Uuid) -> AppResult<Arc<Session>> {
        let session = self
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))?;
        session.touch();
        Ok(session)
    }

    pub async fn remove_session(&self, id: Uuid) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))
    }
}

/// Drops sessions idle for longer than `ttl`; sessions with a request in flight stay
fn prune_idle(
    sessions: &mut HashMap<Uuid, Arc<Session>>,
    ttl: Duration,
    now: DateTime<Utc>,
) -> usize {
    let before = sessions.len();
    sessions.retain(|_, s| s.is_loading() || now - s.last_active() <= ttl);
    before - sessions.len()
}

/// Removes least recently active idle sessions until at most `limit` remain
fn evict_oldest(sessions: &mut HashMap<Uuid, Arc<Session>>, limit: usize) -> usize {
    if sessions.len() <= limit {
        return 0;
    }

    let mut by_activity: Vec<(DateTime<Utc>, Uuid)> = sessions
        .values()
        .filter(|s| !s.is_loading())
        .map(|s| (s.last_active(), s.id))
        .collect();
    by_activity.sort();

    let excess = sessions.len() - limit;
    let mut evicted = 0;
    for (_, id) in by_activity.into_iter().take(excess) {
        sessions.remove(&id);
        evicted += 1;
    }
    evicted
}

/// One user's view: the latest destination batch and what they are looking at
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Milliseconds since the epoch of the last lookup
    last_active: AtomicI64,
    loading: AtomicBool,
    view: RwLock<SessionView>,
}

/// Snapshot of a session's view state
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    pub destinations: Vec<Destination>,
    pub generated_at: Option<DateTime<Utc>>,
    /// Destination whose nearby places are open
    pub nearby_index: Option<usize>,
    /// Destination whose hotels are being browsed
    pub hotels_index: Option<usize>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            last_active: AtomicI64::new(now.timestamp_millis()),
            loading: AtomicBool::new(false),
            view: RwLock::new(SessionView::default()),
        }
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.last_active.load(Ordering::Relaxed))
            .unwrap_or(self.created_at)
    }

    fn touch(&self) {
        self.last_active
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Marks a recommendation request as in flight
    ///
    /// Fails if one is already running. The flag is cleared when the returned
    /// guard drops, whichever way the request ends.
    pub fn begin_request(&self) -> AppResult<LoadingGuard<'_>> {
        self.loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AppError::RequestInFlight)?;
        Ok(LoadingGuard {
            flag: &self.loading,
        })
    }

    pub async fn view(&self) -> SessionView {
        self.view.read().await.clone()
    }

    /// Swaps in a new destination batch; selections into the old batch are dropped
    pub async fn replace_destinations(&self, destinations: Vec<Destination>) {
        *self.view.write().await = SessionView {
            destinations,
            generated_at: Some(Utc::now()),
            nearby_index: None,
            hotels_index: None,
        };
    }

    /// Looks up a destination and records it as the open nearby panel
    pub async fn open_nearby(&self, index: usize) -> AppResult<Destination> {
        let mut view = self.view.write().await;
        let destination = destination_at(&view.destinations, index)?;
        view.nearby_index = Some(index);
        Ok(destination)
    }

    pub async fn close_nearby(&self) {
        self.view.write().await.nearby_index = None;
    }

    /// Looks up a destination and records it as the hotels being browsed
    pub async fn open_hotels(&self, index: usize) -> AppResult<Destination> {
        let mut view = self.view.write().await;
        let destination = destination_at(&view.destinations, index)?;
        view.hotels_index = Some(index);
        Ok(destination)
    }
}

fn destination_at(destinations: &[Destination], index: usize) -> AppResult<Destination> {
    destinations
        .get(index)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Destination {} not found", index)))
}

/// Clears the session's loading flag on drop
pub struct LoadingGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

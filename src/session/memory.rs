use std::{collections::HashMap, sync::Arc, time::Duration as StdDuration};

use {
    axum::async_trait,
    time::{Duration, OffsetDateTime},
    tokio::{sync::RwLock, time::interval},
    tracing::{debug, trace},
};

use super::SessionStore;
use crate::{
    model::{Session, SessionId, UserId},
    Error,
};

const DEFAULT_TTL: Duration = Duration::days(1);

#[derive(Debug, Clone)]
pub struct MemoryStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
    ttl: Duration,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions established through [`MemoryStore::create`] live for `ttl`.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            ttl,
        }
    }

    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Establishes a session for `user` that lives for the store's ttl.
    pub async fn create(&self, user: UserId) -> Session {
        let session = Session::new(user, self.ttl);
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        debug!(user = %session.user, "Session created");
        session
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drops every session expired at `now`, returning how many went.
    pub async fn delete_expired(&self, now: OffsetDateTime) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        before - sessions.len()
    }

    /// Runs [`MemoryStore::delete_expired`] every `period`, forever.
    pub async fn continuously_delete_expired(self, period: StdDuration) {
        let mut ticker = interval(period);
        loop {
            ticker.tick().await;
            let removed = self.delete_expired(OffsetDateTime::now_utc()).await;
            if removed > 0 {
                debug!(removed, "Reaped expired sessions");
            }
        }
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert(&self, session: Session) -> Result<(), Error> {
        self.sessions.write().await.insert(session.id.clone(), session);
        Ok(())
    }

    async fn lookup(&self, id: &SessionId) -> Result<Option<Session>, Error> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn destroy(&self, id: &SessionId) -> Result<bool, Error> {
        let removed = self.sessions.write().await.remove(id).is_some();
        trace!(removed, "Session destroy");
        Ok(removed)
    }
}

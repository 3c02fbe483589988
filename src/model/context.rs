use std::{
    fmt::{Debug, Formatter},
    future::Future,
    sync::Arc,
};

use tokio::time::timeout;

use super::{Session, SessionId};
use crate::{session::SessionStore, Config, Error};

/// Router state: configuration plus the session store every gate check and
/// logout goes through.
#[derive(Clone)]
pub struct Context {
    pub config: Arc<Config>,
    pub store: Arc<dyn SessionStore>,
}

impl Debug for Context {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("store", &self.store)
            .finish()
    }
}

impl Context {
    #[must_use]
    pub fn new(config: Config, store: Arc<dyn SessionStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// # Errors
    ///
    /// Returns the store's error, or `SessionStoreTimeout` if the lookup takes
    /// longer than `session.store_timeout_ms`.
    pub async fn lookup_session(&self, id: &SessionId) -> Result<Option<Session>, Error> {
        self.bounded(self.store.lookup(id)).await
    }

    /// # Errors
    ///
    /// Returns the store's error, or `SessionStoreTimeout` if the delete takes
    /// longer than `session.store_timeout_ms`.
    pub async fn destroy_session(&self, id: &SessionId) -> Result<bool, Error> {
        self.bounded(self.store.destroy(id)).await
    }

    async fn bounded<T>(
        &self,
        op: impl Future<Output = Result<T, Error>> + Send,
    ) -> Result<T, Error> {
        let limit = self.config.session.store_timeout();
        timeout(limit, op)
            .await
            .map_err(|_| Error::SessionStoreTimeout(limit))?
    }
}

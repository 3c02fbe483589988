use std::sync::Arc;

use {axum::http::HeaderValue, tracing::debug};

use crate::{
    model::Context,
    session::{MemoryStore, SessionStore},
    web::ProtectedApp,
    AppRouter, Config, Error,
};

use super::Server;

type RouterFactory = dyn FnOnce(&Arc<Context>) -> AppRouter + Send + 'static;

enum Store {
    Memory(MemoryStore),
    Custom(Arc<dyn SessionStore>),
}

pub struct Builder {
    config: Config,
    store: Store,
    protected_router_factory: Option<Box<RouterFactory>>,
    unprotected_router_factory: Option<Box<RouterFactory>>,
}

impl Builder {
    pub fn new(config: Config) -> Self {
        debug!("Initializing Builder with config: {:?}", config);

        let store = Store::Memory(MemoryStore::with_ttl(config.session.ttl()));

        Self {
            config,
            store,
            protected_router_factory: None,
            unprotected_router_factory: None,
        }
    }

    /// Uses `store` and runs the expired-session reaper over it. The store keeps
    /// its own ttl.
    #[must_use]
    pub fn with_memory_store(mut self, store: MemoryStore) -> Self {
        self.store = Store::Memory(store);
        self
    }

    /// Uses an external store. Expiry housekeeping is left to the store.
    #[must_use]
    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Store::Custom(store);
        self
    }

    /// Extra routes that sit behind the gate alongside the greeting and logout.
    #[must_use]
    pub fn with_protected_router<F>(mut self, factory: F) -> Self
    where
        F: FnOnce(&Arc<Context>) -> AppRouter + Send + 'static,
    {
        self.protected_router_factory = Some(Box::new(factory));
        self
    }

    #[must_use]
    pub fn with_unprotected_router<F>(mut self, factory: F) -> Self
    where
        F: FnOnce(&Arc<Context>) -> AppRouter + Send + 'static,
    {
        self.unprotected_router_factory = Some(Box::new(factory));
        self
    }

    /// Spawns the expired-session reaper when the memory store is in use.
    ///
    /// # Errors
    ///
    /// Fails if the configured session cookie cannot be written as a header value.
    pub async fn build(self) -> Result<Server, Error> {
        HeaderValue::from_str(&self.config.session.expired_cookie().to_string())?;

        let store: Arc<dyn SessionStore> = match self.store {
            Store::Memory(memory) => {
                if let Some(period) = self.config.session.reap_interval() {
                    debug!("Spawning session reaper every {:?}", period);
                    tokio::spawn(memory.clone().continuously_delete_expired(period));
                }
                Arc::new(memory)
            }
            Store::Custom(store) => store,
        };

        let app_ctx = Arc::new(Context::new(self.config, store));

        let protected_router = self
            .protected_router_factory
            .map(|factory| factory(&app_ctx));
        let unprotected_router = self
            .unprotected_router_factory
            .map(|factory| factory(&app_ctx));

        let router = ProtectedApp::new(app_ctx.clone(), protected_router, unprotected_router)
            .create_router();

        debug!("Server built successfully");
        Ok(Server {
            router: router.with_state(app_ctx.clone()),
            config: app_ctx.config.clone(),
        })
    }
}

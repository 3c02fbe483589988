#![allow(dead_code)]

use std::{sync::Arc, time::Duration as StdDuration};

use {
    session_gate::{
        axum::{
            async_trait,
            body::{to_bytes, Body},
            http::{Request, Response},
            Router,
        },
        model::{Session, SessionId, UserId},
        session::{MemoryStore, SessionStore},
        Builder, Config, Error,
    },
    tower::ServiceExt,
};

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.session.reap_interval_secs = 0;
    config.session.store_timeout_ms = 200;
    config
}

pub async fn app_with_memory(config: Config, store: &MemoryStore) -> Router {
    Builder::new(config)
        .with_memory_store(store.clone())
        .build()
        .await
        .expect("build server")
        .router
}

pub async fn app_with_store(config: Config, store: Arc<dyn SessionStore>) -> Router {
    Builder::new(config)
        .with_session_store(store)
        .build()
        .await
        .expect("build server")
        .router
}

pub async fn live_session(store: &MemoryStore) -> Session {
    store.create(UserId::new("alice")).await
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub fn get_with_cookie(uri: &str, id: &SessionId) -> Request<Body> {
    Request::get(uri)
        .header("cookie", format!("session_id={}", id.secret()))
        .body(Body::empty())
        .unwrap()
}

pub fn get_with_bearer(uri: &str, id: &SessionId) -> Request<Body> {
    Request::get(uri)
        .header("authorization", format!("Bearer {}", id.secret()))
        .body(Body::empty())
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// Wraps a memory store and injects failures or latency per capability.
#[derive(Debug, Clone, Default)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    pub fail_lookup: bool,
    pub fail_destroy: bool,
    pub lookup_delay: Option<StdDuration>,
    pub destroy_delay: Option<StdDuration>,
}

#[async_trait]
impl SessionStore for FaultyStore {
    async fn insert(&self, session: Session) -> Result<(), Error> {
        self.inner.insert(session).await
    }

    async fn lookup(&self, id: &SessionId) -> Result<Option<Session>, Error> {
        if let Some(delay) = self.lookup_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_lookup {
            return Err(Error::SessionStoreFailure("lookup unavailable".into()));
        }
        self.inner.lookup(id).await
    }

    async fn destroy(&self, id: &SessionId) -> Result<bool, Error> {
        if let Some(delay) = self.destroy_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_destroy {
            return Err(Error::SessionStoreFailure("destroy unavailable".into()));
        }
        self.inner.destroy(id).await
    }
}

use std::fmt::Debug;

use {axum::async_trait, time::OffsetDateTime};

use crate::{
    model::{Session, SessionId},
    Error,
};

mod memory;
pub use memory::MemoryStore;

/// Server-side session records, keyed by the credential clients present.
///
/// Sessions are established elsewhere (the identity provider login flow) and
/// handed over with [`SessionStore::insert`]. `lookup` must be free of side
/// effects, and `destroy` must be atomic with respect to concurrent lookups:
/// a reader sees either the whole record or nothing.
#[async_trait]
pub trait SessionStore: Debug + Send + Sync + 'static {
    async fn insert(&self, session: Session) -> Result<(), Error>;

    async fn lookup(&self, id: &SessionId) -> Result<Option<Session>, Error>;

    /// Removes the record. Returns `false` if there was nothing to remove.
    async fn destroy(&self, id: &SessionId) -> Result<bool, Error>;

    async fn is_valid(&self, id: &SessionId, now: OffsetDateTime) -> Result<bool, Error> {
        Ok(self
            .lookup(id)
            .await?
            .is_some_and(|session| !session.is_expired(now)))
    }
}

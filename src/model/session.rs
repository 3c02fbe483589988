use std::fmt;

use {
    axum::{async_trait, extract::FromRequestParts, http::request::Parts},
    serde::{Deserialize, Serialize},
    time::{Duration, OffsetDateTime},
    uuid::Uuid,
};

use crate::Error;

/// The opaque credential a client presents, by cookie or bearer header.
#[derive(Clone, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn new_random() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionId([redacted])")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub user: UserId,
    pub expires_at: OffsetDateTime,
}

impl Session {
    /// Expiry saturates at the representable bounds for out-of-range `ttl`s.
    pub fn new(user: UserId, ttl: Duration) -> Self {
        Self {
            id: SessionId::new_random(),
            user,
            expires_at: OffsetDateTime::now_utc().saturating_add(ttl),
        }
    }

    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }
}

/// Proof that the gate resolved the request's credential to a live session.
///
/// Handlers take it as an extractor; it is only present in the request
/// extensions once the gate has let the request through.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AuthenticatedContext {
    pub session_id: SessionId,
    pub user: UserId,
}

impl From<Session> for AuthenticatedContext {
    fn from(session: Session) -> Self {
        Self {
            session_id: session.id,
            user: session.user,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedContext
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or(Error::Unauthenticated)
    }
}

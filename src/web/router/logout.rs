use url::form_urlencoded;

use crate::{
    axum::{
        http::{header::SET_COOKIE, HeaderValue},
        response::{IntoResponse, Redirect, Response},
        routing::get,
    },
    model::{AuthenticatedContext, Context},
    tracing::{debug, info},
    AppRouter, Error,
};

pub const LOGOUT_SUCCESS_MESSAGE: &str =
    "Successfully logged out. You can close this window or navigate back to the application.";

/// Which sessions a logout asks to end. Only the local session is ever
/// destroyed; `Global` leaves the identity provider's session active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutScope {
    Local,
    Global,
}

#[derive(Debug, Default)]
pub struct LogoutParams {
    pub global: Option<String>,
}

impl LogoutParams {
    /// Reads the first `global` pair from a raw query string. Unknown or
    /// repeated parameters never reject the request.
    pub fn from_query(query: Option<&str>) -> Self {
        let global = query.and_then(|query| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(name, _)| name == "global")
                .map(|(_, value)| value.into_owned())
        });
        Self { global }
    }

    pub fn scope(&self) -> LogoutScope {
        match self.global.as_deref().map(str::trim) {
            None | Some("false" | "0") => LogoutScope::Local,
            Some(_) => LogoutScope::Global,
        }
    }
}

/// Protected: must sit behind the gate.
pub fn router(logout: &str) -> AppRouter {
    AppRouter::new().route(logout, get(self::get::logout))
}

pub fn success_router(logout_success: &str) -> AppRouter {
    AppRouter::new().route(logout_success, get(self::get::logout_success))
}

/// Destroys the local session behind `auth` and answers with a 303 to the
/// confirmation page, expiring the session cookie on the way.
///
/// # Errors
///
/// Store failures and timeouts propagate; no redirect is produced for them.
pub async fn logout(
    ctx: &Context,
    auth: &AuthenticatedContext,
    scope: LogoutScope,
) -> Result<Response, Error> {
    if scope == LogoutScope::Global {
        info!(user = %auth.user, "Global logout requested; only the local session is ended");
    }

    if ctx.destroy_session(&auth.session_id).await? {
        info!(user = %auth.user, "Session destroyed");
    } else {
        debug!(user = %auth.user, "Session was already gone");
    }

    let success = ctx.config.routes.with_root().logout_success;
    let cookie = HeaderValue::from_str(&ctx.config.session.expired_cookie().to_string())?;

    let mut response = Redirect::to(&success).into_response();
    response.headers_mut().append(SET_COOKIE, cookie);
    Ok(response)
}

mod get {
    use std::sync::Arc;

    use crate::{
        axum::{
            extract::{RawQuery, State},
            response::Response,
        },
        model::{AuthenticatedContext, Context},
        Error,
    };

    use super::{LogoutParams, LOGOUT_SUCCESS_MESSAGE};

    pub async fn logout(
        State(ctx): State<Arc<Context>>,
        auth: AuthenticatedContext,
        RawQuery(query): RawQuery,
    ) -> Result<Response, Error> {
        let scope = LogoutParams::from_query(query.as_deref()).scope();
        super::logout(&ctx, &auth, scope).await
    }

    pub async fn logout_success() -> &'static str {
        LOGOUT_SUCCESS_MESSAGE
    }
}

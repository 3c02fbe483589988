use std::sync::Arc;

use {
    axum::{
        extract::{Request, State},
        http::{
            header::{AUTHORIZATION, COOKIE},
            HeaderMap, StatusCode, Uri,
        },
        middleware::Next,
        response::{IntoResponse, Redirect, Response},
    },
    cookie::Cookie,
    time::OffsetDateTime,
    tracing::{debug, error},
    url::form_urlencoded,
};

use crate::{
    model::{AuthenticatedContext, Context, SessionId},
    Challenge, Error,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authentication {
    Authenticated(AuthenticatedContext),
    Unauthenticated,
}

/// Resolves `credential` to a live session. Never mutates the store.
///
/// # Errors
///
/// Store failures and timeouts are returned as errors, not as `Unauthenticated`.
pub async fn authenticate(
    ctx: &Context,
    credential: Option<&SessionId>,
    now: OffsetDateTime,
) -> Result<Authentication, Error> {
    let Some(id) = credential else {
        debug!("No session credential presented");
        return Ok(Authentication::Unauthenticated);
    };

    match ctx.lookup_session(id).await? {
        Some(session) if !session.is_expired(now) => {
            debug!(user = %session.user, "Session is live");
            Ok(Authentication::Authenticated(session.into()))
        }
        Some(_) => {
            debug!("Session has expired");
            Ok(Authentication::Unauthenticated)
        }
        None => {
            debug!("No session for presented credential");
            Ok(Authentication::Unauthenticated)
        }
    }
}

/// Reads the credential from the session cookie, falling back to a bearer token.
pub fn credential_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<SessionId> {
    session_cookie(headers, cookie_name).or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .and_then(|header| header.trim().split_once(' '))
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
            .map(|(_, token)| token.trim())
            .filter(|token| !token.is_empty())
            .map(SessionId::new)
    })
}

fn session_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|header| Cookie::split_parse(header))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == cookie_name && !cookie.value_trimmed().is_empty())
        .map(|cookie| SessionId::new(cookie.value_trimmed()))
}

/// Route layer for protected routes: lets the request through with an
/// [`AuthenticatedContext`] attached, or answers with the configured challenge.
pub async fn require_session(
    State(ctx): State<Arc<Context>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Error> {
    let credential = credential_from_headers(req.headers(), &ctx.config.session.cookie_name);

    match authenticate(&ctx, credential.as_ref(), OffsetDateTime::now_utc()).await? {
        Authentication::Authenticated(auth) => {
            debug!("Authenticated user in session, continuing");
            req.extensions_mut().insert(auth);
            Ok(next.run(req).await)
        }
        Authentication::Unauthenticated => Ok(challenge(&ctx, req.uri())),
    }
}

fn challenge(ctx: &Context, original_uri: &Uri) -> Response {
    match ctx.config.challenge {
        Challenge::Unauthorized => Error::Unauthenticated.into_response(),
        Challenge::RedirectToLogin => {
            let login_url = ctx.config.routes.with_root().login;
            redirect_to_login(&login_url, original_uri)
        }
    }
}

fn redirect_to_login(login_url: &str, original_uri: &Uri) -> Response {
    let Some(next) = original_uri.path_and_query() else {
        error!("Original uri has no path");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    let separator = if login_url.contains('?') { '&' } else { '?' };
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("next", next.as_str())
        .finish();
    let target = format!("{login_url}{separator}{query}");

    debug!("Redirecting to login url: {}", target);
    Redirect::temporary(&target).into_response()
}

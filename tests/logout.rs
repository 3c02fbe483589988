mod common;

use std::{sync::Arc, time::Duration as StdDuration};

use {
    cookie::{Cookie, SameSite},
    session_gate::{
        axum::{
            body::Body,
            http::{header, Request, Response, StatusCode},
        },
        session::{MemoryStore, SessionStore},
    },
    time::Duration,
};

use common::*;

fn set_cookie(response: &Response<Body>) -> Cookie<'static> {
    let value = response.headers()[header::SET_COOKIE].to_str().unwrap();
    Cookie::parse(value.to_string()).unwrap()
}

#[tokio::test]
async fn logout_redirects_to_confirmation_and_expires_cookie() {
    let store = MemoryStore::new();
    let session = live_session(&store).await;
    let app = app_with_memory(test_config(), &store).await;

    let response = send(&app, get_with_cookie("/logout", &session.id)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/logout/success");
    let cookie = set_cookie(&response);
    assert_eq!(cookie.name(), "session_id");
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    assert!(store.lookup(&session.id).await.unwrap().is_none());
}

#[tokio::test]
async fn logged_out_session_cannot_be_replayed() {
    let store = MemoryStore::new();
    let session = live_session(&store).await;
    let app = app_with_memory(test_config(), &store).await;

    let before = send(&app, get_with_cookie("/hello", &session.id)).await;
    assert_eq!(before.status(), StatusCode::OK);

    let logout = send(&app, get_with_cookie("/logout", &session.id)).await;
    assert_eq!(logout.status(), StatusCode::SEE_OTHER);

    let cookie_replay = send(&app, get_with_cookie("/hello", &session.id)).await;
    assert_eq!(cookie_replay.status(), StatusCode::UNAUTHORIZED);

    let bearer_replay = send(&app, get_with_bearer("/hello", &session.id)).await;
    assert_eq!(bearer_replay.status(), StatusCode::UNAUTHORIZED);

    let second_logout = send(&app, get_with_cookie("/logout", &session.id)).await;
    assert_eq!(second_logout.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn global_parameter_never_changes_the_outcome() {
    for query in ["", "?global=true", "?global=false", "?global=1", "?global=", "?global=yes"] {
        let store = MemoryStore::new();
        let session = live_session(&store).await;
        let app = app_with_memory(test_config(), &store).await;

        let response = send(&app, get_with_cookie(&format!("/logout{query}"), &session.id)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER, "query {query:?}");
        assert_eq!(response.headers()[header::LOCATION], "/logout/success");
        assert!(store.is_empty().await, "query {query:?}");
    }
}

#[tokio::test]
async fn logout_leaves_other_sessions_alone() {
    let store = MemoryStore::new();
    let mine = live_session(&store).await;
    let theirs = live_session(&store).await;
    let app = app_with_memory(test_config(), &store).await;

    send(&app, get_with_cookie("/logout", &mine.id)).await;

    let response = send(&app, get_with_cookie("/hello", &theirs.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn failed_destroy_is_a_server_error_not_a_redirect() {
    let store = FaultyStore {
        fail_destroy: true,
        ..FaultyStore::default()
    };
    let session = live_session(&store.inner).await;
    let app = app_with_store(test_config(), Arc::new(store.clone())).await;

    let response = send(&app, get_with_cookie("/logout", &session.id)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(header::LOCATION).is_none());
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert!(store.inner.lookup(&session.id).await.unwrap().is_some());
}

#[tokio::test]
async fn slow_destroy_times_out_as_a_server_error() {
    let store = FaultyStore {
        destroy_delay: Some(StdDuration::from_secs(5)),
        ..FaultyStore::default()
    };
    let session = live_session(&store.inner).await;
    let mut config = test_config();
    config.session.store_timeout_ms = 20;
    let app = app_with_store(config, Arc::new(store)).await;

    let response = send(&app, get_with_cookie("/logout", &session.id)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(header::LOCATION).is_none());
}

#[tokio::test]
async fn secure_cookie_settings_carry_into_the_expired_cookie() {
    let store = MemoryStore::new();
    let session = live_session(&store).await;
    let mut config = test_config();
    config.session.secure = true;
    let app = app_with_memory(config, &store).await;

    let response = send(&app, get_with_cookie("/logout", &session.id)).await;

    assert_eq!(set_cookie(&response).secure(), Some(true));
}

#[tokio::test]
async fn repeated_global_parameter_still_logs_out() {
    for query in ["global=true&global=false", "global=false&global=true", "global&global=1"] {
        let store = MemoryStore::new();
        let session = live_session(&store).await;
        let app = app_with_memory(test_config(), &store).await;

        let response = send(&app, get_with_cookie(&format!("/logout?{query}"), &session.id)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER, "query {query:?}");
        assert_eq!(response.headers()[header::LOCATION], "/logout/success");
        assert!(store.is_empty().await, "query {query:?}");
    }
}

#[tokio::test]
async fn unrelated_query_parameters_are_ignored() {
    let store = MemoryStore::new();
    let session = live_session(&store).await;
    let app = app_with_memory(test_config(), &store).await;

    let response = send(
        &app,
        get_with_cookie("/logout?redirect=%2Fhome&x&lang=en", &session.id),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn quoted_session_cookie_logs_out() {
    let store = MemoryStore::new();
    let session = live_session(&store).await;
    let app = app_with_memory(test_config(), &store).await;

    let request = Request::get("/logout")
        .header(header::COOKIE, format!("session_id=\"{}\"", session.id.secret()))
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(store.is_empty().await);
}

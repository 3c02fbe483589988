#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod app;
mod error;
pub mod model;
pub mod session;
mod util;
mod web;

use std::sync::Arc;

pub use {axum, tracing};

pub use {
    app::{
        middleware::gate::{authenticate, credential_from_headers, Authentication},
        Builder, Server,
    },
    error::Error,
    util::{
        Challenge, Config, LoggerConfig, Routes, SameSiteConfig, SessionConfig, TracingLogger,
        Verbosity, Website,
    },
    web::router::{
        greeting::GREETING,
        logout::{logout, LogoutParams, LogoutScope, LOGOUT_SUCCESS_MESSAGE},
    },
};

pub type AppRouter = axum::Router<Arc<model::Context>>;

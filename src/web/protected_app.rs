use std::sync::Arc;

use crate::{
    app::middleware::gate::require_session,
    axum::{http::Uri, middleware::from_fn_with_state},
    model::Context,
    tracing::{debug, info},
    web::router::{greeting, logout},
    AppRouter, Error,
};

pub struct ProtectedApp {
    app_ctx: Arc<Context>,
    protected_router: Option<AppRouter>,
    unprotected_router: Option<AppRouter>,
}

impl ProtectedApp {
    pub const fn new(
        app_ctx: Arc<Context>,
        protected_router: Option<AppRouter>,
        unprotected_router: Option<AppRouter>,
    ) -> Self {
        Self {
            app_ctx,
            protected_router,
            unprotected_router,
        }
    }

    /// Greeting and logout (plus any extra protected routes) behind the gate,
    /// the logout confirmation and extra unprotected routes in front of it,
    /// and a 404 fallback for everything else.
    pub fn create_router(self) -> AppRouter {
        debug!("Creating gated router");
        let routes = self.app_ctx.config.routes.with_root();

        let mut protected = greeting::router(&routes.greeting).merge(logout::router(&routes.logout));
        if let Some(router) = self.protected_router {
            debug!("Merging provided protected_router");
            protected = protected.merge(router);
        }

        let gate = from_fn_with_state(self.app_ctx.clone(), require_session);
        info!("Authentication gate created");

        let mut router = protected
            .route_layer(gate)
            .merge(logout::success_router(&routes.logout_success));
        if let Some(unprotected) = self.unprotected_router {
            debug!("Merging provided unprotected_router");
            router = router.merge(unprotected);
        }

        router.fallback(not_found)
    }
}

async fn not_found(uri: Uri) -> Error {
    debug!("No route for {}", uri);
    Error::NotFound(uri.path().to_string())
}

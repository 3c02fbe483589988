use crate::{axum::routing::get, AppRouter};

pub const GREETING: &str = "Hello from RESTEasy Reactive";

/// Protected: must sit behind the gate.
pub fn router(greeting: &str) -> AppRouter {
    AppRouter::new().route(greeting, get(self::get::hello))
}

mod get {
    use crate::model::AuthenticatedContext;

    use super::GREETING;

    pub async fn hello(_auth: AuthenticatedContext) -> &'static str {
        GREETING
    }
}

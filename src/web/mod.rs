pub use protected_app::ProtectedApp;

mod protected_app;
pub mod router;

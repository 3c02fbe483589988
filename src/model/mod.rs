mod session;
pub use session::{AuthenticatedContext, Session, SessionId, UserId};

mod context;
pub use context::Context;

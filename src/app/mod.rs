mod builder;
pub use builder::Builder;

pub mod middleware;

mod server;
pub use server::Server;

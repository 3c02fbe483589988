mod config;
pub use config::{
    Challenge, Config, LoggerConfig, Routes, SameSiteConfig, SessionConfig, Verbosity, Website,
};

mod logger;
pub use logger::TracingLogger;

pub(crate) mod http;

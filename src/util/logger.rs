use {
    tracing::{debug, subscriber::set_global_default, Level},
    tracing_appender::non_blocking::WorkerGuard,
    tracing_subscriber::fmt::format::FmtSpan,
};

use super::config::{Config, Verbosity};
use crate::Error;

pub struct TracingLogger {
    _guard: WorkerGuard,
}

impl TracingLogger {
    fn new(level: Level) -> Result<Self, Error> {
        let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());

        let subscriber = tracing_subscriber::fmt()
            .with_writer(non_blocking)
            .with_max_level(level)
            .with_span_events(FmtSpan::CLOSE)
            .finish();

        set_global_default(subscriber)?;

        Ok(Self { _guard: guard })
    }

    /// Installs the global subscriber. Keep the returned value alive for as long
    /// as log lines should be flushed.
    ///
    /// # Errors
    ///
    /// Fails if a global subscriber has already been installed.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let level = match config.logger.verbosity {
            Verbosity::Trace => Level::TRACE,
            Verbosity::Debug => Level::DEBUG,
            Verbosity::Info => Level::INFO,
            Verbosity::Warn => Level::WARN,
            Verbosity::Error => Level::ERROR,
        };
        let logger = Self::new(level)?;
        debug!("Logger initialized with verbosity: {}", config.logger.verbosity);
        Ok(logger)
    }
}

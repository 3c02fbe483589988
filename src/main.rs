use session_gate::{tracing::info, Builder, Config, Error, TracingLogger};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::load("./config")?;
    let _logger = TracingLogger::from_config(&config)?;
    info!("Configuration loaded for run mode {}", config.run_mode);

    Builder::new(config).build().await?.start().await
}

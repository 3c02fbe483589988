use std::{net::SocketAddr, sync::Arc};

use {
    axum::Router,
    tracing::{debug, info, warn},
};

use crate::{util::http::serve_http, Config, Error};

pub struct Server {
    pub router: Router,
    pub config: Arc<Config>,
}

impl Server {
    /// Serves until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Fails if the listener cannot be bound.
    pub async fn start(self) -> Result<(), Error> {
        debug!("Starting server with configuration: {:?}", self.config);

        let http_addr = SocketAddr::from((
            self.config.website.bind_address,
            self.config.website.bind_port,
        ));

        serve_http(http_addr, self.router, shutdown_signal()).await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

use std::{future::Future, net::SocketAddr};

use {
    axum::{extract::Request, Router},
    hyper::body::Incoming,
    hyper_util::{
        rt::{TokioExecutor, TokioIo},
        server::conn::auto::Builder as AutoBuilder,
    },
    tokio::net::TcpListener,
    tower::ServiceExt,
    tracing::{debug, error, info},
};

use crate::Error;

/// Accepts connections on `addr` until `shutdown` resolves. Connections already
/// accepted keep running on their own tasks.
pub async fn serve_http<F>(addr: SocketAddr, router: Router, shutdown: F) -> Result<(), Error>
where
    F: Future<Output = ()> + Send,
{
    debug!("Starting HTTP server at address {}", addr);

    let listener = TcpListener::bind(addr).await?;
    info!("http listening on {}", listener.local_addr()?);

    tokio::pin!(shutdown);

    loop {
        let accepted = tokio::select! {
            () = &mut shutdown => break,
            accepted = listener.accept() => accepted,
        };

        match accepted {
            Ok((stream, remote_addr)) => {
                let io = TokioIo::new(stream);
                let router = router.clone();

                tokio::task::spawn(async move {
                    let service = hyper::service::service_fn(move |req: Request<Incoming>| {
                        router.clone().oneshot(req)
                    });

                    if let Err(err) = AutoBuilder::new(TokioExecutor::new())
                        .serve_connection(io, service)
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", remote_addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {:?}", e);
            }
        }
    }

    debug!("HTTP server loop ended");
    Ok(())
}

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::logger::RequestLogger;
use crate::router::Router;

/// Binds the configured address and serves connections until an error.
pub async fn run(cfg: Arc<Config>, logger: Arc<dyn RequestLogger>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(cfg.listen_addr())
        .await
        .with_context(|| format!("failed to bind {}", cfg.listen_addr()))?;
    info!("Listening on {}", cfg.listen_addr());

    serve(listener, cfg, logger).await
}

/// Accept loop over an already bound listener.
///
/// At most `max_connections` connections are handled at once; further
/// clients wait in the accept backlog until a permit frees up. A failed
/// accept is logged and skipped rather than ending the loop.
pub async fn serve(
    listener: TcpListener,
    cfg: Arc<Config>,
    logger: Arc<dyn RequestLogger>,
) -> anyhow::Result<()> {
    let router = Arc::new(Router::new(&cfg));
    let permits = Arc::new(Semaphore::new(cfg.max_connections));

    loop {
        let permit = permits.clone().acquire_owned().await?;
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to accept connection");
                continue;
            }
        };
        tracing::debug!("Accepted connection from {}", peer);

        let router = router.clone();
        let logger = logger.clone();
        let read_size = cfg.read_buffer_size;
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, peer.ip().to_string(), read_size, router, logger);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
            drop(permit);
        });
    }
}

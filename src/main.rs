use std::sync::Arc;

use hearth::config::Config;
use hearth::logger::FileLogger;
use hearth::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Arc::new(Config::load()?);
    let logger = Arc::new(FileLogger::open(&cfg.log_file)?);

    tracing::info!(web_root = %cfg.web_root.display(), "Serving files");

    tokio::select! {
        res = server::listener::run(cfg.clone(), logger) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

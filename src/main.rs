//! Application entrypoint and state wiring.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use movie_ledger::chain::{Chain, ChainHandle, LogObserver};
use movie_ledger::cli::Cli;
use movie_ledger::{create_app, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    // 1) chain, owned here and shared with the router
    let mut chain = Chain::new();
    info!(hash = %chain.genesis().hash, "genesis block created");
    if !cli.no_dump {
        chain = chain.with_observer(Arc::new(LogObserver));
    }
    let app = create_app(ChainHandle::new(chain));

    // 2) serve
    let listener = TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("bind {}", cli.listen))?;
    info!("listening on http://{}", cli.listen);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}

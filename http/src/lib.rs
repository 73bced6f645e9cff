#[macro_use]
extern crate tracing;

pub mod error;
pub mod router;

use axum::Router;
use eyre::Result;
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub use router::create_router;

/// Serves `router` until Ctrl-C is received.
pub async fn serve(listen_address: SocketAddr, router: Router) -> Result<()> {
    let listener = TcpListener::bind(listen_address).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

pub mod pages;
pub mod routes;

pub use pages::Page;
pub use routes::{router, ApiError, SharedContext};

use crate::error::Result;
use crate::processors::ReportContext;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Serves the dashboard until Ctrl-C.
pub async fn serve(context: ReportContext, address: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(address).await?;
    info!("Dashboard listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(Arc::new(context)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

//! HTTP surface for literature queries.
//!
//! One JSON endpoint wraps [`LiteratureSearch::search`]; a health probe sits
//! beside it. Shuts down gracefully on Ctrl-C.

pub mod transport;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::discovery::LiteratureSearch;

/// HTTP server around a shared search engine.
pub struct LiteratureServer {
    search: Arc<LiteratureSearch>,
}

impl LiteratureServer {
    /// Create a server.
    #[must_use]
    pub fn new(search: LiteratureSearch) -> Self {
        Self { search: Arc::new(search) }
    }

    /// Run the HTTP server until shutdown.
    ///
    /// # Errors
    ///
    /// Returns error if the port cannot be bound or the server fails.
    pub async fn run_http(self, port: u16) -> anyhow::Result<()> {
        let router = transport::create_router(self.search);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        tracing::info!("HTTP server listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

impl std::fmt::Debug for LiteratureServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiteratureServer").field("search", &self.search).finish()
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}

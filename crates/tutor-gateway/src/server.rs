use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tutor_common::{Error, Result};

use crate::router::build_router;
use crate::state::SharedState;

/// Binds the configured address and serves the router until Ctrl-C.
pub struct GatewayServer {
    state: SharedState,
}

impl GatewayServer {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }

    pub async fn run(self) -> Result<()> {
        let gateway = &self.state.config.gateway;
        let addr = format!("{}:{}", gateway.host, gateway.port);

        let listener = TcpListener::bind(&addr).await?;
        info!(
            "tutor gateway listening on {} (llm: {}, tools: {})",
            listener.local_addr()?,
            self.state.orchestrator.extractor().provider_id(),
            self.state.orchestrator.tool_client_id()
        );

        let app = build_router(self.state.clone());
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Gateway(format!("server error: {}", e)))?;

        info!("tutor gateway stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await
}

/// Resolves when `signal` fires. If the signal cannot be installed, never
/// resolves, so the server keeps running instead of stopping right away.
async fn wait_for_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            warn!("failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

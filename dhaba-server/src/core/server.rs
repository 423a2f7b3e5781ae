//! HTTP server assembly and startup

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::{Config, ServerState};
use crate::api;

pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let state = ServerState::initialize(&config)?;
        Ok(Self { config, state })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let cors = if self.config.is_production() {
            CorsLayer::new()
        } else {
            CorsLayer::permissive()
        };

        let app = api::router(self.state)
            .layer(TraceLayer::new_for_http())
            .layer(cors);

        let addr = format!("0.0.0.0:{}", self.config.http_port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        info!(%addr, "server listening");

        axum::serve(listener, app)
            .await
            .context("server terminated unexpectedly")?;
        Ok(())
    }
}

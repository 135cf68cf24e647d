// MoodChat Backend Entry Point
// Emotion inference with keyword overrides, served over HTTP

mod brain;
mod config;
mod error;
mod preflight;
mod server;
mod telemetry;

#[cfg(test)]
mod tests;

use config::AppConfig;
use server::AppState;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;
    telemetry::init_tracing(config.log_format);

    // Artifacts load once; a missing model is fatal
    let pipeline = match preflight::initialize(&config).await {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Startup aborted: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState {
        pipeline: Arc::new(pipeline),
        request_timeout: config.request_timeout(),
    };
    let app = server::router(state);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

use anyhow::{Context, Result};
use posture_service::{api, HttpVisionClient, PostureEngine, PostureServiceConfig, PostureServiceState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let _logging = telemetry::init_with_service("posture-service");

    info!("Starting Posture Service...");

    // Load configuration from environment
    let config = PostureServiceConfig::from_env()?;
    info!(
        bind = %config.bind_addr,
        node_id = %config.node_id,
        vision = %config.vision_url.origin().ascii_serialization(),
        weights = ?config.weights.as_array(),
        "Posture Service configuration"
    );
    if config.vision_api_key.is_none() {
        warn!("VISION_API_KEY is not set; image analysis requests will likely be rejected");
    }

    let engine = PostureEngine::new(config.weights).context("invalid score weights")?;
    let vision = HttpVisionClient::new(
        config.vision_url.clone(),
        config.vision_api_key.as_deref(),
        config.vision_timeout,
    )
    .context("failed to build vision client")?;

    let state = PostureServiceState::new(config.node_id.clone(), engine, Arc::new(vision));

    // Build HTTP router
    let app = api::router(state);

    // Bind and serve
    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("Posture Service listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Posture Service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }

    info!("Shutting down gracefully...");
}

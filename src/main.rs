use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use letterlens::llm::GeminiAdapter;
use letterlens::{config::Config, routes::create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "letterlens=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    if config.llm.google_api_key.is_empty() {
        warn!("GOOGLE_API_KEY is not set; analysis requests will fail until it is configured");
    }

    // Create shared state with the Gemini-backed analyzer
    let analyzer = Arc::new(GeminiAdapter::new(
        &config.llm.google_api_key,
        &config.llm.model,
    ));
    let state = AppState {
        config: config.clone(),
        analyzer,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

//! Overlay Clock - fullscreen clock/timer overlay server
//!
//! This is the main entry point for the overlay-clock application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use overlay_clock::{
    api::create_router,
    clock::SystemClock,
    config::Config,
    state::AppState,
    tasks::display_tick_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("overlay_clock={},tower_http=info", config.log_level()))
        .init();

    info!("Starting overlay-clock v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, tick={}ms, lang={}",
        config.host, config.port, config.tick_ms, config.lang
    );

    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        Arc::new(SystemClock),
        config.preferences(),
        config.style(),
    ));

    // Refresh the display snapshot at the configured cadence
    let tick_state = Arc::clone(&state);
    let tick_period = config.tick_period();
    tokio::spawn(async move {
        display_tick_task(tick_state, tick_period).await;
    });

    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /display           - Current display snapshot");
    info!("  GET  /display/events    - Display snapshot stream (SSE)");
    info!("  POST /mode, /mode/next  - Switch mode");
    info!("  POST /timer/reset|pause|set");
    info!("  POST /style, /text, /window, /language/toggle");
    info!("  POST /background/color|image, /viewport");
    info!("  GET  /status, /health");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => tracing::error!("Signal handler failed: {}", e),
            }
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

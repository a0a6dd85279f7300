//! HTTP API module
//!
//! The control surface a presentation layer uses to drive the clock and read
//! what to draw.

mod error;
pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/display", get(display_handler))
        .route("/display/events", get(display_events_handler))
        .route("/mode", post(mode_handler))
        .route("/mode/next", post(next_mode_handler))
        .route("/timer/reset", post(reset_handler))
        .route("/timer/pause", post(pause_handler))
        .route("/timer/set", post(set_time_handler))
        .route("/style", post(style_handler))
        .route("/background/color", post(background_color_handler))
        .route("/background/image", post(background_image_handler))
        .route("/viewport", post(viewport_handler))
        .route("/text", post(text_handler))
        .route("/window", post(window_handler))
        .route("/language/toggle", post(language_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tracing::{info, warn};

use crate::{
    error::{AppError, ClockError},
    state::{AppState, DisplayPreferences, DisplaySnapshot, Rgb, StyleSnapshot},
};
use super::responses::{
    BackgroundResponse, ColorRequest, HealthResponse, ImageRequest, LanguageResponse, ModeRequest,
    NextModeRequest, SetTimeRequest, StatusResponse, StyleRequest, TextRequest, TimerResponse,
    ViewportRequest, WindowRequest,
};

type ApiResult<T> = Result<Json<T>, AppError>;

fn timer_response(state: &AppState, message: String) -> ApiResult<TimerResponse> {
    let engine = state.get_engine()?;
    let reading = engine.current_time(state.now());
    Ok(Json(TimerResponse::new(message, engine.snapshot(), reading.text)))
}

fn background_response(state: &AppState) -> ApiResult<BackgroundResponse> {
    let (viewport_width, viewport_height) = state.get_viewport()?;
    Ok(Json(BackgroundResponse {
        viewport_width,
        viewport_height,
        layout: state.background_layout()?,
    }))
}

/// Handle GET /display - What to draw right now
pub async fn display_handler(State(state): State<Arc<AppState>>) -> ApiResult<DisplaySnapshot> {
    Ok(Json(state.display_snapshot()?))
}

/// Handle GET /display/events - Stream display snapshots as they are published
pub async fn display_events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe();
    let events = stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let snapshot = rx.borrow_and_update().clone();
        let event = Event::default()
            .event("display")
            .json_data(&snapshot)
            .unwrap_or_else(|e| {
                warn!("Failed to encode display event: {}", e);
                Event::default().event("error").data(e.to_string())
            });
        Some((Ok::<Event, Infallible>(event), (rx, false)))
    });
    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle POST /mode - Switch directly to a mode
pub async fn mode_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ModeRequest>,
) -> ApiResult<TimerResponse> {
    let mode = state.set_mode(request.mode, request.seconds)?;
    info!("Mode endpoint called - now in {}", mode);
    timer_response(&state, format!("Mode set to {}", mode))
}

/// Handle POST /mode/next - Cycle clock -> count-up -> count-down
pub async fn next_mode_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NextModeRequest>,
) -> ApiResult<TimerResponse> {
    let mode = state.switch_mode(request.seconds)?;
    info!("Mode cycled to {}", mode);
    timer_response(&state, format!("Mode set to {}", mode))
}

/// Handle POST /timer/reset
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ApiResult<TimerResponse> {
    state.reset_timer()?;
    timer_response(&state, "Timer reset".to_string())
}

/// Handle POST /timer/pause - Pause or resume
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> ApiResult<TimerResponse> {
    let paused = state.toggle_pause()?;
    let message = if paused { "Timer paused" } else { "Timer running" };
    timer_response(&state, message.to_string())
}

/// Handle POST /timer/set - Clock time, count-up seed or countdown total
pub async fn set_time_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetTimeRequest>,
) -> ApiResult<TimerResponse> {
    state.set_time_value(&request.value)?;
    timer_response(&state, format!("Time set to {}", request.value.trim()))
}

/// Handle POST /style - Partial style update
pub async fn style_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StyleRequest>,
) -> ApiResult<StyleSnapshot> {
    let style = state.update_style(|style| {
        if let Some(size) = request.time_font_size {
            style.set_time_font_size(size);
        }
        if let Some(size) = request.text_font_size {
            style.set_text_font_size(size);
        }
        if let Some(percent) = request.background_scale_percent {
            style.set_background_scale_percent(percent);
        }
        if let Some(hex) = &request.text_color {
            style.set_text_color(Rgb::from_hex(hex)?);
        }
        if let Some(red) = request.red {
            style.set_red(red);
        }
        if let Some(green) = request.green {
            style.set_green(green);
        }
        if let Some(blue) = request.blue {
            style.set_blue(blue);
        }
        Ok::<(), ClockError>(())
    })?;
    Ok(Json(style.snapshot()))
}

/// Handle POST /background/color
pub async fn background_color_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ColorRequest>,
) -> ApiResult<BackgroundResponse> {
    state.set_background_color(&request.color)?;
    background_response(&state)
}

/// Handle POST /background/image
pub async fn background_image_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ImageRequest>,
) -> ApiResult<BackgroundResponse> {
    match (request.width, request.height) {
        (Some(width), Some(height)) => {
            state.set_background_image(request.path, width, height)?;
        }
        (None, None) => {
            state.load_background_image(request.path).await?;
        }
        _ => {
            return Err(ClockError::InvalidInput(
                "give both width and height, or neither".to_string(),
            )
            .into())
        }
    }
    background_response(&state)
}

/// Handle POST /viewport - The window was resized
pub async fn viewport_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ViewportRequest>,
) -> ApiResult<BackgroundResponse> {
    state.set_viewport(request.width, request.height)?;
    background_response(&state)
}

/// Handle POST /text - Change the caption under the time
pub async fn text_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TextRequest>,
) -> ApiResult<DisplayPreferences> {
    Ok(Json(state.set_custom_text(request.text)?))
}

/// Handle POST /window - Fullscreen and toolbar visibility
pub async fn window_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WindowRequest>,
) -> ApiResult<DisplayPreferences> {
    if let Some(fullscreen) = request.fullscreen {
        state.set_fullscreen(fullscreen)?;
    }
    if let Some(visible) = request.toolbar_visible {
        state.set_toolbar_visible(visible)?;
    }
    Ok(Json(state.get_preferences()?))
}

/// Handle POST /language/toggle
pub async fn language_handler(State(state): State<Arc<AppState>>) -> ApiResult<LanguageResponse> {
    let language = state.toggle_language()?;
    Ok(Json(LanguageResponse { language }))
}

/// Handle GET /status - Return the full application state
pub async fn status_handler(State(state): State<Arc<AppState>>) -> ApiResult<StatusResponse> {
    let timer = state.get_engine()?.snapshot();
    let style = state.get_style()?.snapshot();
    let preferences = state.get_preferences()?;
    let (viewport_width, viewport_height) = state.get_viewport()?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        style,
        preferences,
        viewport_width,
        viewport_height,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

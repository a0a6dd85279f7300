//! Main application state management

use std::{
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, warn};

use super::{
    background::{read_image_size, Background, BackgroundLayout},
    display_state::{DisplayPreferences, Language},
    style_state::{Rgb, StyleState},
    timer_state::{Mode, StateLabel, TimeModeEngine},
};
use crate::{
    clock::Clock,
    error::{AppError, ClockError},
};

/// Window size assumed until the presentation layer reports one
pub const DEFAULT_VIEWPORT: (i64, i64) = (1280, 720);

/// Everything the presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySnapshot {
    pub time: String,
    pub mode: Mode,
    pub label: StateLabel,
    pub custom_text: String,
    pub text_color: String,
    pub time_font_size: u32,
    pub text_font_size: u32,
    pub background: BackgroundLayout,
    pub fullscreen: bool,
    pub toolbar_visible: bool,
    pub language: Language,
    pub computed_at: DateTime<Utc>,
}

/// Application state shared by the HTTP handlers and the display tick
pub struct AppState {
    /// Time display state machine
    pub engine: Mutex<TimeModeEngine>,
    pub style: Mutex<StyleState>,
    pub preferences: Mutex<DisplayPreferences>,
    /// Current window size in pixels
    pub viewport: Mutex<(i64, i64)>,
    clock: Arc<dyn Clock>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Latest display snapshot
    pub display_tx: watch::Sender<DisplaySnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _display_rx: watch::Receiver<DisplaySnapshot>,
}

impl AppState {
    /// Create a new AppState with the given starting preferences
    pub fn new(
        port: u16,
        host: String,
        clock: Arc<dyn Clock>,
        preferences: DisplayPreferences,
        style: StyleState,
    ) -> Self {
        let engine = TimeModeEngine::new();
        let initial = build_snapshot(&engine, &style, &preferences, DEFAULT_VIEWPORT, clock.now())
            .unwrap_or_else(|e| {
                warn!("Initial display layout failed: {}", e);
                fallback_snapshot(&engine, &style, &preferences, clock.now())
            });
        let (display_tx, display_rx) = watch::channel(initial);

        Self {
            engine: Mutex::new(engine),
            style: Mutex::new(style),
            preferences: Mutex::new(preferences),
            viewport: Mutex::new(DEFAULT_VIEWPORT),
            clock,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            display_tx,
            _display_rx: display_rx,
        }
    }

    /// Current wall-clock time from the injected clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn lock_engine(&self) -> Result<MutexGuard<'_, TimeModeEngine>, AppError> {
        self.engine.lock().map_err(|_| AppError::Poisoned("timer engine"))
    }

    fn lock_style(&self) -> Result<MutexGuard<'_, StyleState>, AppError> {
        self.style.lock().map_err(|_| AppError::Poisoned("style state"))
    }

    fn lock_preferences(&self) -> Result<MutexGuard<'_, DisplayPreferences>, AppError> {
        self.preferences.lock().map_err(|_| AppError::Poisoned("display preferences"))
    }

    fn lock_viewport(&self) -> Result<MutexGuard<'_, (i64, i64)>, AppError> {
        self.viewport.lock().map_err(|_| AppError::Poisoned("viewport"))
    }

    /// Record the action and push a fresh snapshot to watchers
    fn after_update(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
        if let Err(e) = self.publish_display() {
            warn!("Failed to publish display after {}: {}", action, e);
        }
    }

    /// Apply a timer operation at the current instant
    pub fn update_engine<T, F>(&self, action: &str, updater: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut TimeModeEngine, DateTime<Utc>) -> Result<T, ClockError>,
    {
        let now = self.now();
        let mut engine = self.lock_engine()?;
        let result = updater(&mut *engine, now)?;
        drop(engine);

        self.after_update(action);
        Ok(result)
    }

    pub fn set_mode(&self, mode: Mode, initial_seconds: Option<i64>) -> Result<Mode, AppError> {
        self.update_engine("mode", |engine, now| {
            engine.set_mode(mode, initial_seconds, now).map(|()| mode)
        })
    }

    pub fn switch_mode(&self, countdown_seconds: Option<i64>) -> Result<Mode, AppError> {
        self.update_engine("mode-next", |engine, now| engine.switch_mode(countdown_seconds, now))
    }

    pub fn reset_timer(&self) -> Result<(), AppError> {
        self.update_engine("reset", |engine, now| {
            engine.reset(now);
            Ok(())
        })
    }

    /// Returns whether the counter is paused afterwards
    pub fn toggle_pause(&self) -> Result<bool, AppError> {
        self.update_engine("pause", |engine, now| {
            engine.toggle_pause(now);
            Ok(engine.is_paused())
        })
    }

    pub fn set_time_value(&self, raw: &str) -> Result<(), AppError> {
        self.update_engine("set-time", |engine, now| engine.set_time_value(raw, now))
    }

    pub fn set_clock_offset(&self, target: &str) -> Result<(), AppError> {
        self.update_engine("clock-offset", |engine, now| engine.set_clock_offset(target, now))
    }

    /// Apply a style change; the setters clamp on their own
    pub fn update_style<F>(&self, updater: F) -> Result<StyleState, AppError>
    where
        F: FnOnce(&mut StyleState) -> Result<(), ClockError>,
    {
        let mut style = self.lock_style()?;
        let mut edited = style.clone();
        updater(&mut edited)?;
        *style = edited.clone();
        drop(style);

        self.after_update("style");
        Ok(edited)
    }

    /// Change the window preferences
    pub fn update_preferences<F>(&self, action: &str, updater: F) -> Result<DisplayPreferences, AppError>
    where
        F: FnOnce(&mut DisplayPreferences),
    {
        let mut preferences = self.lock_preferences()?;
        updater(&mut *preferences);
        let updated = preferences.clone();
        drop(preferences);

        self.after_update(action);
        Ok(updated)
    }

    pub fn set_custom_text(&self, text: String) -> Result<DisplayPreferences, AppError> {
        info!("Setting caption to: {:?}", text);
        self.update_preferences("text", |prefs| prefs.custom_text = text)
    }

    /// Solid background; drops any background image
    pub fn set_background_color(&self, hex: &str) -> Result<BackgroundLayout, AppError> {
        let color = Rgb::from_hex(hex)?;
        info!("Setting background color to {}", color);
        self.update_preferences("background-color", |prefs| {
            prefs.background = Background::Color { color }
        })?;
        self.background_layout()
    }

    pub fn set_background_image(
        &self,
        path: PathBuf,
        width: u32,
        height: u32,
    ) -> Result<BackgroundLayout, AppError> {
        let background = Background::image(path, width, height)?;
        info!("Setting background image to {:?}", background);
        self.update_preferences("background-image", |prefs| prefs.background = background)?;
        self.background_layout()
    }

    /// Read the image size off the runtime, then install it as background
    pub async fn load_background_image(&self, path: PathBuf) -> Result<BackgroundLayout, AppError> {
        let image_path = path.clone();
        let (width, height) = tokio::task::spawn_blocking(move || read_image_size(&image_path))
            .await
            .map_err(|e| AppError::Task(e.to_string()))??;
        self.set_background_image(path, width, height)
    }

    pub fn set_viewport(&self, width: i64, height: i64) -> Result<BackgroundLayout, AppError> {
        *self.lock_viewport()? = (width, height);
        self.after_update("viewport");
        self.background_layout()
    }

    pub fn set_fullscreen(&self, enabled: bool) -> Result<DisplayPreferences, AppError> {
        info!("Fullscreen: {}", enabled);
        self.update_preferences("fullscreen", |prefs| prefs.fullscreen = enabled)
    }

    pub fn set_toolbar_visible(&self, visible: bool) -> Result<DisplayPreferences, AppError> {
        info!("Toolbar visible: {}", visible);
        self.update_preferences("toolbar", |prefs| prefs.toolbar_visible = visible)
    }

    pub fn toggle_language(&self) -> Result<Language, AppError> {
        let prefs = self.update_preferences("language", |prefs| {
            prefs.language = prefs.language.toggled()
        })?;
        info!("Language switched to {}", prefs.language);
        Ok(prefs.language)
    }

    /// Where the background goes for the current viewport and scale
    pub fn background_layout(&self) -> Result<BackgroundLayout, AppError> {
        let scale = self.lock_style()?.background_scale_percent();
        let viewport = *self.lock_viewport()?;
        let background = self.lock_preferences()?.background.clone();
        Ok(BackgroundLayout::compute(&background, viewport, scale)?)
    }

    /// Compute what the screen should show right now
    pub fn display_snapshot(&self) -> Result<DisplaySnapshot, AppError> {
        let now = self.now();
        let engine = self.lock_engine()?.clone();
        let style = self.lock_style()?.clone();
        let preferences = self.lock_preferences()?.clone();
        let viewport = *self.lock_viewport()?;
        Ok(build_snapshot(&engine, &style, &preferences, viewport, now)?)
    }

    /// Compute a snapshot and hand it to watchers
    pub fn publish_display(&self) -> Result<DisplaySnapshot, AppError> {
        let snapshot = self.display_snapshot()?;
        if let Err(e) = self.display_tx.send(snapshot.clone()) {
            warn!("Failed to send display update: {}", e);
        }
        Ok(snapshot)
    }

    pub fn subscribe(&self) -> watch::Receiver<DisplaySnapshot> {
        self.display_tx.subscribe()
    }

    pub fn get_engine(&self) -> Result<TimeModeEngine, AppError> {
        Ok(self.lock_engine()?.clone())
    }

    pub fn get_style(&self) -> Result<StyleState, AppError> {
        Ok(self.lock_style()?.clone())
    }

    pub fn get_preferences(&self) -> Result<DisplayPreferences, AppError> {
        Ok(self.lock_preferences()?.clone())
    }

    pub fn get_viewport(&self) -> Result<(i64, i64), AppError> {
        Ok(*self.lock_viewport()?)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

fn build_snapshot(
    engine: &TimeModeEngine,
    style: &StyleState,
    preferences: &DisplayPreferences,
    viewport: (i64, i64),
    now: DateTime<Utc>,
) -> Result<DisplaySnapshot, ClockError> {
    let background =
        BackgroundLayout::compute(&preferences.background, viewport, style.background_scale_percent())?;
    let mut snapshot = fallback_snapshot(engine, style, preferences, now);
    snapshot.background = background;
    Ok(snapshot)
}

/// Snapshot with a plain black background
fn fallback_snapshot(
    engine: &TimeModeEngine,
    style: &StyleState,
    preferences: &DisplayPreferences,
    now: DateTime<Utc>,
) -> DisplaySnapshot {
    let reading = engine.current_time(now);
    DisplaySnapshot {
        time: reading.text,
        mode: reading.mode,
        label: reading.label,
        custom_text: preferences.custom_text.clone(),
        text_color: style.text_color_hex(),
        time_font_size: style.time_font_size(),
        text_font_size: style.text_font_size(),
        background: BackgroundLayout::Color { color: Rgb::BLACK.to_hex() },
        fullscreen: preferences.fullscreen,
        toolbar_visible: preferences.toolbar_visible,
        language: preferences.language,
        computed_at: now,
    }
}

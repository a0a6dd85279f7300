//! API request and response structures

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{
    BackgroundLayout, DisplayPreferences, Language, Mode, StyleSnapshot, TimerSnapshot,
};

/// Body of POST /mode
#[derive(Debug, Clone, Deserialize)]
pub struct ModeRequest {
    pub mode: Mode,
    /// Countdown total, or count-up starting seconds
    pub seconds: Option<i64>,
}

/// Body of POST /mode/next
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NextModeRequest {
    pub seconds: Option<i64>,
}

/// Body of POST /timer/set
#[derive(Debug, Clone, Deserialize)]
pub struct SetTimeRequest {
    pub value: String,
}

/// Body of POST /style; absent fields stay as they are
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StyleRequest {
    pub time_font_size: Option<i64>,
    pub text_font_size: Option<i64>,
    pub background_scale_percent: Option<i64>,
    pub text_color: Option<String>,
    pub red: Option<i64>,
    pub green: Option<i64>,
    pub blue: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColorRequest {
    pub color: String,
}

/// Body of POST /background/image. Without a size the file header is read.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageRequest {
    pub path: PathBuf,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewportRequest {
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindowRequest {
    pub fullscreen: Option<bool>,
    pub toolbar_visible: Option<bool>,
}

/// Response for timer operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
    pub time: String,
}

impl TimerResponse {
    pub fn new(message: impl Into<String>, timer: TimerSnapshot, time: String) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now(),
            timer,
            time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundResponse {
    pub viewport_width: i64,
    pub viewport_height: i64,
    pub layout: BackgroundLayout,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageResponse {
    pub language: Language,
}

/// Full status, for debugging and for presentation layers starting up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub style: StyleSnapshot,
    pub preferences: DisplayPreferences,
    pub viewport_width: i64,
    pub viewport_height: i64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Body of every failed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

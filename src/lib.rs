//! Overlay Clock - a fullscreen clock/timer overlay core
//!
//! The core keeps the time-mode state machine (clock, count-up, count-down),
//! the text style and the background cover-fit. A thin HTTP surface lets any
//! presentation layer drive it and read what to draw.

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{AppError, ClockError};
pub use state::{AppState, Mode, TimeModeEngine};
pub use utils::signals::shutdown_signal;

//! State management module
//!
//! The clock core (timer engine, style, background fitting) and the
//! application state that wraps it.

pub mod app_state;
pub mod background;
pub mod display_state;
pub mod style_state;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, DisplaySnapshot};
pub use background::{fit, Background, BackgroundFit, BackgroundLayout, BackgroundSpec};
pub use display_state::{DisplayPreferences, Language};
pub use style_state::{Rgb, StyleSnapshot, StyleState};
pub use timer_state::{format_hms, Mode, StateLabel, TimeModeEngine, TimeReading, TimerSnapshot, TimerState};

//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::state::{display_state::DEFAULT_CAPTION, DisplayPreferences, Language, StyleState};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "overlay-clock")]
#[command(about = "Fullscreen clock/timer overlay controlled over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Display refresh period in milliseconds
    #[arg(long, default_value = "200", value_parser = clap::value_parser!(u64).range(10..=10_000))]
    pub tick_ms: u64,

    /// Caption shown under the time
    #[arg(long, default_value = DEFAULT_CAPTION)]
    pub text: String,

    /// UI language (zh or en)
    #[arg(long, default_value = "zh")]
    pub lang: Language,

    /// Initial time font size (clamped to 24..=240)
    #[arg(long, default_value = "96")]
    pub time_font_size: i64,

    /// Initial caption font size (clamped to 12..=120)
    #[arg(long, default_value = "36")]
    pub text_font_size: i64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn preferences(&self) -> DisplayPreferences {
        DisplayPreferences::new(self.text.clone(), self.lang)
    }

    pub fn style(&self) -> StyleState {
        let mut style = StyleState::new();
        style.set_time_font_size(self.time_font_size);
        style.set_text_font_size(self.text_font_size);
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["overlay-clock"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.tick_period(), Duration::from_millis(200));
        assert_eq!(config.lang, Language::Zh);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn font_sizes_are_clamped() {
        let config =
            Config::try_parse_from(["overlay-clock", "--time-font-size", "999", "--lang", "en"]).unwrap();
        assert_eq!(config.style().time_font_size(), 240);
        assert_eq!(config.preferences().language, Language::En);
    }

    #[test]
    fn rejects_tiny_tick() {
        assert!(Config::try_parse_from(["overlay-clock", "--tick-ms", "1"]).is_err());
    }
}

//! Window and caption preferences

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::background::Background;

pub const DEFAULT_CAPTION: &str = "Fullscreen Desktop Clock";

/// UI language chosen in the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
}

impl Language {
    pub fn toggled(self) -> Self {
        match self {
            Language::Zh => Language::En,
            Language::En => Language::Zh,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Language::Zh => "zh",
            Language::En => "en",
        })
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zh" => Ok(Language::Zh),
            "en" => Ok(Language::En),
            other => Err(format!("unknown language {:?}, expected zh or en", other)),
        }
    }
}

/// Everything about the window that is not the time or the font styling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPreferences {
    pub custom_text: String,
    pub background: Background,
    pub fullscreen: bool,
    pub toolbar_visible: bool,
    pub language: Language,
}

impl DisplayPreferences {
    pub fn new(custom_text: impl Into<String>, language: Language) -> Self {
        Self {
            custom_text: custom_text.into(),
            background: Background::default(),
            fullscreen: false,
            toolbar_visible: true,
            language,
        }
    }
}

impl Default for DisplayPreferences {
    fn default() -> Self {
        Self::new(DEFAULT_CAPTION, Language::default())
    }
}

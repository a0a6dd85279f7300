//! Text styling preferences with clamped ranges

use std::{fmt, ops::RangeInclusive};

use serde::{Deserialize, Serialize};

use crate::error::ClockError;

pub const TIME_FONT_SIZE_RANGE: RangeInclusive<u32> = 24..=240;
pub const TEXT_FONT_SIZE_RANGE: RangeInclusive<u32> = 12..=120;
pub const BACKGROUND_SCALE_RANGE: RangeInclusive<u32> = 20..=300;

/// An 8-bit-per-channel color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `RRGGBB`
    pub fn from_hex(raw: &str) -> Result<Self, ClockError> {
        let digits = raw.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ClockError::invalid(format!("expected a #RRGGBB color, got {:?}", raw)));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ClockError::invalid(format!("bad color channel in {:?}", raw)))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// `#RRGGBB`, uppercase
    pub fn to_hex(self) -> String {
        self.to_string()
    }

    /// `0xRRGGBB`
    pub fn packed(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Font sizes, text color and background scale.
///
/// Every setter clamps into the field's range; the color lives as three
/// channels and its hex form is derived on read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleState {
    time_font_size: u32,
    text_font_size: u32,
    background_scale_percent: u32,
    text_color: Rgb,
}

impl StyleState {
    pub fn new() -> Self {
        Self {
            time_font_size: 96,
            text_font_size: 36,
            background_scale_percent: 100,
            text_color: Rgb::WHITE,
        }
    }

    pub fn time_font_size(&self) -> u32 {
        self.time_font_size
    }

    pub fn text_font_size(&self) -> u32 {
        self.text_font_size
    }

    pub fn background_scale_percent(&self) -> u32 {
        self.background_scale_percent
    }

    pub fn text_color(&self) -> Rgb {
        self.text_color
    }

    pub fn text_color_hex(&self) -> String {
        self.text_color.to_hex()
    }

    pub fn set_time_font_size(&mut self, size: i64) -> u32 {
        self.time_font_size = clamp(size, &TIME_FONT_SIZE_RANGE);
        self.time_font_size
    }

    pub fn set_text_font_size(&mut self, size: i64) -> u32 {
        self.text_font_size = clamp(size, &TEXT_FONT_SIZE_RANGE);
        self.text_font_size
    }

    pub fn set_background_scale_percent(&mut self, percent: i64) -> u32 {
        self.background_scale_percent = clamp(percent, &BACKGROUND_SCALE_RANGE);
        self.background_scale_percent
    }

    pub fn set_text_color(&mut self, color: Rgb) {
        self.text_color = color;
    }

    pub fn set_red(&mut self, value: i64) {
        self.text_color.r = channel(value);
    }

    pub fn set_green(&mut self, value: i64) {
        self.text_color.g = channel(value);
    }

    pub fn set_blue(&mut self, value: i64) {
        self.text_color.b = channel(value);
    }

    pub fn snapshot(&self) -> StyleSnapshot {
        StyleSnapshot {
            time_font_size: self.time_font_size,
            text_font_size: self.text_font_size,
            background_scale_percent: self.background_scale_percent,
            text_color: self.text_color,
            text_color_hex: self.text_color_hex(),
        }
    }
}

impl Default for StyleState {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable view of [`StyleState`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSnapshot {
    pub time_font_size: u32,
    pub text_font_size: u32,
    pub background_scale_percent: u32,
    pub text_color: Rgb,
    pub text_color_hex: String,
}

fn clamp(value: i64, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(i64::from(*range.start()), i64::from(*range.end())) as u32
}

fn channel(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

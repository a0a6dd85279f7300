//! Background source and cover-fit layout

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::style_state::Rgb;
use crate::error::ClockError;

/// Inputs for fitting a background image to the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundSpec {
    pub source_width: i64,
    pub source_height: i64,
    pub viewport_width: i64,
    pub viewport_height: i64,
    pub scale_percent: u32,
}

impl BackgroundSpec {
    pub fn fit(&self) -> Result<BackgroundFit, ClockError> {
        fit(
            self.source_width,
            self.source_height,
            self.viewport_width,
            self.viewport_height,
            self.scale_percent,
        )
    }
}

/// Where and how large to draw the background image.
/// Offsets are from the viewport's top-left and go negative when the image
/// overflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundFit {
    pub draw_width: i64,
    pub draw_height: i64,
    pub offset_x: i64,
    pub offset_y: i64,
}

/// Scale the source so it covers the viewport, apply the user scale and
/// center it. Viewport sides below 1 count as 1.
pub fn fit(
    source_width: i64,
    source_height: i64,
    viewport_width: i64,
    viewport_height: i64,
    scale_percent: u32,
) -> Result<BackgroundFit, ClockError> {
    if source_width <= 0 || source_height <= 0 {
        return Err(ClockError::invalid(format!(
            "background image size must be positive, got {}x{}",
            source_width, source_height
        )));
    }
    let viewport_width = viewport_width.max(1);
    let viewport_height = viewport_height.max(1);

    let base_scale = f64::max(
        viewport_width as f64 / source_width as f64,
        viewport_height as f64 / source_height as f64,
    );
    let final_scale = base_scale * f64::from(scale_percent) / 100.0;

    let draw_width = ((source_width as f64 * final_scale).round() as i64).max(1);
    let draw_height = ((source_height as f64 * final_scale).round() as i64).max(1);

    Ok(BackgroundFit {
        draw_width,
        draw_height,
        offset_x: (viewport_width - draw_width).div_euclid(2),
        offset_y: (viewport_height - draw_height).div_euclid(2),
    })
}

/// What fills the window behind the text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Background {
    Color { color: Rgb },
    Image { path: PathBuf, width: u32, height: u32 },
}

impl Background {
    pub fn image(path: impl Into<PathBuf>, width: u32, height: u32) -> Result<Self, ClockError> {
        if width == 0 || height == 0 {
            return Err(ClockError::invalid(format!(
                "background image size must be positive, got {}x{}",
                width, height
            )));
        }
        Ok(Background::Image { path: path.into(), width, height })
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Color { color: Rgb::BLACK }
    }
}

/// Read the pixel size of an image file from its header
pub fn read_image_size(path: &Path) -> Result<(u32, u32), ClockError> {
    image::image_dimensions(path)
        .map_err(|e| ClockError::invalid(format!("cannot load background {}: {}", path.display(), e)))
}

/// Background as the presentation layer should draw it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackgroundLayout {
    Color {
        color: String,
    },
    Image {
        path: PathBuf,
        #[serde(flatten)]
        fit: BackgroundFit,
    },
}

impl BackgroundLayout {
    /// Lay out `background` in a viewport of the given size
    pub fn compute(
        background: &Background,
        viewport: (i64, i64),
        scale_percent: u32,
    ) -> Result<Self, ClockError> {
        match background {
            Background::Color { color } => Ok(BackgroundLayout::Color { color: color.to_hex() }),
            Background::Image { path, width, height } => {
                let placement = fit(
                    i64::from(*width),
                    i64::from(*height),
                    viewport.0,
                    viewport.1,
                    scale_percent,
                )?;
                Ok(BackgroundLayout::Image { path: path.clone(), fit: placement })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_a_square_viewport() {
        let placed = fit(100, 50, 200, 200, 100).unwrap();
        assert_eq!(
            placed,
            BackgroundFit { draw_width: 400, draw_height: 200, offset_x: -100, offset_y: 0 }
        );
    }

    #[test]
    fn exact_aspect_fills_without_offset() {
        let placed = fit(1920, 1080, 1280, 720, 100).unwrap();
        assert_eq!((placed.draw_width, placed.draw_height), (1280, 720));
        assert_eq!((placed.offset_x, placed.offset_y), (0, 0));
    }

    #[test]
    fn user_scale_shrinks_and_centers() {
        let placed = fit(100, 100, 200, 100, 50).unwrap();
        assert_eq!((placed.draw_width, placed.draw_height), (100, 100));
        assert_eq!((placed.offset_x, placed.offset_y), (50, 0));
    }

    #[test]
    fn odd_overflow_floors_the_offset() {
        let placed = fit(10, 10, 11, 10, 100).unwrap();
        assert_eq!((placed.draw_width, placed.draw_height), (11, 11));
        assert_eq!((placed.offset_x, placed.offset_y), (0, -1));

        let placed = fit(2, 1, 1, 3, 100).unwrap();
        assert_eq!((placed.draw_width, placed.draw_height), (6, 3));
        assert_eq!(placed.offset_x, -3);
    }

    #[test]
    fn draw_size_never_drops_below_one() {
        let placed = fit(10_000, 1, 1, 1, 20).unwrap();
        assert_eq!(placed.draw_height, 1);
        assert!(placed.draw_width >= 1);
    }

    #[test]
    fn zero_viewport_is_treated_as_one_pixel() {
        let placed = fit(10, 10, 0, 0, 100).unwrap();
        assert_eq!((placed.draw_width, placed.draw_height), (1, 1));
    }

    #[test]
    fn rejects_empty_source() {
        assert!(matches!(fit(0, 50, 200, 200, 100), Err(ClockError::InvalidInput(_))));
        assert!(matches!(fit(50, -1, 200, 200, 100), Err(ClockError::InvalidInput(_))));
        assert!(Background::image("bg.png", 0, 10).is_err());
    }

    #[test]
    fn background_spec_delegates_to_fit() {
        let spec = BackgroundSpec {
            source_width: 640,
            source_height: 480,
            viewport_width: 1280,
            viewport_height: 720,
            scale_percent: 120,
        };
        assert_eq!(spec.fit().unwrap(), fit(640, 480, 1280, 720, 120).unwrap());
    }

    #[test]
    fn color_layout_uses_hex() {
        let layout = BackgroundLayout::compute(&Background::default(), (800, 600), 100).unwrap();
        assert_eq!(layout, BackgroundLayout::Color { color: "#000000".to_string() });
    }

    #[test]
    fn missing_image_file_is_invalid_input() {
        let err = read_image_size(Path::new("/nonexistent/background.png")).unwrap_err();
        assert!(matches!(err, ClockError::InvalidInput(_)));
    }
}

//! Page geometry and the document color palette for the fixed-canvas (PDF)
//! backend. All values are in PDF points.

use serde::{Deserialize, Serialize};

/// Layout parameters for a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSpec {
    pub width: f32,
    pub height: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    pub left_margin: f32,
    pub right_margin: f32,
    pub line_height: f32,
    pub body_size: f32,
}

impl Default for PageSpec {
    /// A4 (595 × 842 pt), 60 pt margins, 11 pt body on a 15.5 pt baseline.
    fn default() -> Self {
        PageSpec {
            width: 595.0,
            height: 842.0,
            top_margin: 60.0,
            bottom_margin: 60.0,
            left_margin: 60.0,
            right_margin: 60.0,
            line_height: 15.5,
            body_size: 11.0,
        }
    }
}

impl PageSpec {
    /// Horizontal extent available to content.
    pub fn usable_width(&self) -> f32 {
        self.width - self.left_margin - self.right_margin
    }

    /// The lowest `y` (top-down) at which content may still be drawn.
    pub fn max_y(&self) -> f32 {
        self.height - self.bottom_margin
    }

    pub fn content_right(&self) -> f32 {
        self.width - self.right_margin
    }
}

/// An RGB color with components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Rgb { r, g, b }
    }
}

/// Near-black: candidate name, section titles, bullet glyphs, table labels.
pub const COLOR_PRIMARY: Rgb = Rgb::new(0.1, 0.1, 0.1);
/// Muted gray: body text, contact lines, footer page numbers.
pub const COLOR_SECONDARY: Rgb = Rgb::new(0.3, 0.3, 0.3);
/// Brand blue: designation line and section underlines.
pub const COLOR_ACCENT: Rgb = Rgb::new(0.1, 0.3, 0.8);
/// Light gray: separating rules and table borders.
pub const COLOR_LINE: Rgb = Rgb::new(0.8, 0.8, 0.8);
/// Table label-column background.
pub const COLOR_TABLE_HEADER_BG: Rgb = Rgb::new(0.93, 0.93, 0.93);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_spec_sanity() {
        let spec = PageSpec::default();
        assert_eq!(spec.usable_width(), 475.0);
        assert_eq!(spec.max_y(), 782.0);
        assert_eq!(spec.content_right(), 535.0);
        assert!(spec.line_height > spec.body_size);
    }
}

//! Layout math shared by the document renderers: glyph-width measurement,
//! greedy line wrapping, and page geometry.

pub mod font_metrics;
pub mod geometry;
pub mod wrap;

pub use font_metrics::{get_metrics, measure_width, FontStyle};
pub use geometry::{PageSpec, Rgb};
pub use wrap::{wrap_lines, wrapped_height};

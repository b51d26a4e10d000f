//! # Font Management
//!
//! Text measurement for the four standard Helvetica faces. These are among
//! the 14 standard PDF fonts, so nothing is embedded: the PDF writer emits a
//! Type1 reference and the viewer supplies the glyphs.

pub mod metrics;

pub use metrics::StandardFontMetrics;

use crate::style::FontName;

/// Shared font context used by layout and PDF serialization.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontContext;

impl FontContext {
    pub fn new() -> Self {
        Self
    }

    /// Metrics for a face.
    pub fn metrics(&self, font: FontName) -> &'static StandardFontMetrics {
        match font {
            FontName::Helvetica => &metrics::HELVETICA,
            FontName::HelveticaBold => &metrics::HELVETICA_BOLD,
            FontName::HelveticaOblique => &metrics::HELVETICA_OBLIQUE,
            FontName::HelveticaBoldOblique => &metrics::HELVETICA_BOLD_OBLIQUE,
        }
    }

    /// Get the advance width of a single character in points.
    pub fn char_width(&self, ch: char, font: FontName, font_size: f64) -> f64 {
        self.metrics(font).char_width(ch, font_size)
    }

    /// Measure the width of a string in points.
    pub fn measure_string(&self, text: &str, font: FontName, font_size: f64) -> f64 {
        self.metrics(font).measure_string(text, font_size)
    }

    /// Baseline-to-baseline distance for one line, before any extra line gap.
    pub fn line_height(&self, font: FontName, font_size: f64) -> f64 {
        self.metrics(font).line_height(font_size)
    }

    /// Offset from the top of a line box to its baseline.
    pub fn ascent(&self, font: FontName, font_size: f64) -> f64 {
        self.metrics(font).ascent(font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_context_helvetica() {
        let ctx = FontContext::new();
        let w = ctx.char_width(' ', FontName::Helvetica, 12.0);
        assert!((w - 3.336).abs() < 0.001);
    }

    #[test]
    fn test_font_context_bold_wider() {
        let ctx = FontContext::new();
        let regular = ctx.measure_string("Heading", FontName::Helvetica, 12.0);
        let bold = ctx.measure_string("Heading", FontName::HelveticaBold, 12.0);
        assert!(bold > regular, "Bold should be wider than regular");
    }

    #[test]
    fn test_oblique_matches_upright_widths() {
        let ctx = FontContext::new();
        let upright = ctx.measure_string("Hello", FontName::HelveticaBold, 14.0);
        let oblique = ctx.measure_string("Hello", FontName::HelveticaBoldOblique, 14.0);
        assert!((upright - oblique).abs() < 1e-9);
    }

    #[test]
    fn test_measure_scales_with_size() {
        let ctx = FontContext::new();
        let small = ctx.measure_string("Hello", FontName::Helvetica, 10.0);
        let large = ctx.measure_string("Hello", FontName::Helvetica, 20.0);
        assert!((large - 2.0 * small).abs() < 1e-9);
    }
}

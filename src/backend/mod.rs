//! # Rendering Backend
//!
//! The narrow contract between the layout engine and whatever turns draw
//! calls into pages. The engine never inspects pages directly: it measures
//! text, issues draw calls at absolute positions, and manages the page set
//! through this trait.
//!
//! A backend may run in measurement-only mode ([`RenderBackend::is_measuring`]).
//! It then allocates no pages and discards every draw, but still reports
//! the heights the engine needs. The header/footer reservation pass and the
//! row pre-measurement run against such a backend.

pub mod canvas;

pub use canvas::Canvas;

use crate::error::{FolioError, NodeError};
use crate::model::Edges;
use crate::style::{Color, FontName, TextAlign};

/// Where draw calls land on the current page.
///
/// Header and footer bands are stamped into their own layers so that
/// stamping a page twice replaces the band instead of duplicating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Header,
    Body,
    Footer,
}

/// Position and requested size of an image draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageFrame {
    pub x: f64,
    pub y: f64,
    /// Width the image is aligned within.
    pub available_width: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub align: TextAlign,
}

pub trait RenderBackend {
    /// True when the backend only measures: no pages, draws discarded.
    fn is_measuring(&self) -> bool;

    fn page_width(&self) -> f64;
    fn page_height(&self) -> f64;
    /// Page margins in points.
    fn margins(&self) -> Edges;

    fn set_font(&mut self, font: FontName);
    fn set_font_size(&mut self, size: f64);
    fn set_fill_color(&mut self, color: Color);

    /// Height `text` would occupy when wrapped to `width` in the current
    /// font and size.
    fn measure_text_height(&self, text: &str, width: f64, align: TextAlign, line_gap: f64) -> f64;

    /// Draw wrapped text with its top-left corner at `(x, y)`. Returns the
    /// y just below the last line.
    fn draw_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        width: f64,
        align: TextAlign,
        line_gap: f64,
    ) -> Result<f64, NodeError>;

    /// Draw an image. Returns the height it was drawn at.
    fn draw_image(&mut self, source: &str, frame: ImageFrame) -> Result<f64, NodeError>;

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);

    /// Append a page and make it current.
    fn add_page(&mut self);
    /// Make an already-buffered page current.
    fn switch_to_page(&mut self, index: usize) -> Result<(), FolioError>;
    fn current_page(&self) -> usize;
    fn buffered_page_count(&self) -> usize;

    /// Direct subsequent draws at `layer` of the current page. Band layers
    /// are cleared when targeted; the body layer never is.
    fn begin_layer(&mut self, layer: Layer);
}

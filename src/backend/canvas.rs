//! The recording backend.
//!
//! [`Canvas`] turns draw calls into [`LayoutPage`]s of positioned
//! [`DrawCommand`]s, which the PDF writer serializes afterwards. All text
//! measurement goes through the standard font metrics, so a measuring canvas
//! and a drawing canvas always agree on heights.

use std::collections::HashMap;
use std::rc::Rc;

use super::{ImageFrame, Layer, RenderBackend};
use crate::error::{FolioError, NodeError};
use crate::font::FontContext;
use crate::image_loader::{load_image, LoadedImage};
use crate::layout::{DrawCommand, LayoutElement, LayoutPage, TextLine};
use crate::model::{Edges, PageGeometry};
use crate::style::{Color, FontName, TextAlign};
use crate::text::TextLayout;

pub struct Canvas {
    page_width: f64,
    page_height: f64,
    margins: Edges,
    pages: Vec<LayoutPage>,
    current: usize,
    layer: Layer,
    measuring: bool,
    font: FontName,
    font_size: f64,
    fill_color: Color,
    fonts: FontContext,
    text: TextLayout,
    /// Sources already loaded in this run, so a header logo stamped on every
    /// page is decoded once and embedded once.
    images: HashMap<String, Result<Rc<LoadedImage>, NodeError>>,
}

impl Canvas {
    /// A drawing canvas holding one blank page.
    pub fn new(geometry: &PageGeometry) -> Self {
        let mut canvas = Self::blank(geometry, false);
        canvas.add_page();
        canvas
    }

    /// A measurement-only canvas: no pages, draws discarded.
    pub fn measuring(geometry: &PageGeometry) -> Self {
        Self::blank(geometry, true)
    }

    fn blank(geometry: &PageGeometry, measuring: bool) -> Self {
        let (page_width, page_height) = geometry.dimensions();
        Self {
            page_width,
            page_height,
            margins: geometry.margins_pt(),
            pages: Vec::new(),
            current: 0,
            layer: Layer::Body,
            measuring,
            font: FontName::Helvetica,
            font_size: 12.0,
            fill_color: Color::BLACK,
            fonts: FontContext::new(),
            text: TextLayout::new(),
            images: HashMap::new(),
        }
    }

    pub fn pages(&self) -> &[LayoutPage] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<LayoutPage> {
        self.pages
    }

    fn push(&mut self, element: LayoutElement) {
        if self.measuring {
            return;
        }
        let layer = self.layer;
        if let Some(page) = self.pages.get_mut(self.current) {
            page.layer_mut(layer).push(element);
        }
    }

    fn load(&mut self, source: &str) -> Result<Rc<LoadedImage>, NodeError> {
        if let Some(cached) = self.images.get(source) {
            return cached.clone();
        }
        let loaded = load_image(source).map(Rc::new);
        self.images.insert(source.to_string(), loaded.clone());
        loaded
    }
}

impl RenderBackend for Canvas {
    fn is_measuring(&self) -> bool {
        self.measuring
    }

    fn page_width(&self) -> f64 {
        self.page_width
    }

    fn page_height(&self) -> f64 {
        self.page_height
    }

    fn margins(&self) -> Edges {
        self.margins
    }

    fn set_font(&mut self, font: FontName) {
        self.font = font;
    }

    fn set_font_size(&mut self, size: f64) {
        self.font_size = size;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn measure_text_height(&self, text: &str, width: f64, _align: TextAlign, line_gap: f64) -> f64 {
        self.text
            .measure_height(&self.fonts, text, width, self.font, self.font_size, line_gap)
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        width: f64,
        align: TextAlign,
        line_gap: f64,
    ) -> Result<f64, NodeError> {
        if !width.is_finite() || width <= 0.0 {
            return Err(NodeError::Unsupported(format!(
                "text box has no usable width ({:.2})",
                width
            )));
        }

        let broken = self
            .text
            .break_into_lines(&self.fonts, text, width, self.font, self.font_size);
        let line_height = self.fonts.line_height(self.font, self.font_size);
        let ascent = self.fonts.ascent(self.font, self.font_size);
        let advance = line_height + line_gap;

        let lines: Vec<TextLine> = broken
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                let line_x = match align {
                    TextAlign::Left => x,
                    TextAlign::Center => x + (width - line.width) / 2.0,
                    TextAlign::Right => x + width - line.width,
                };
                TextLine {
                    x: line_x,
                    y: y + i as f64 * advance + ascent,
                    text: line.text,
                    width: line.width,
                }
            })
            .collect();

        let height = lines.len() as f64 * advance;
        self.push(LayoutElement {
            x,
            y,
            width,
            height,
            draw: DrawCommand::Text {
                lines,
                font: self.font,
                font_size: self.font_size,
                color: self.fill_color,
            },
        });
        Ok(y + height)
    }

    fn draw_image(&mut self, source: &str, frame: ImageFrame) -> Result<f64, NodeError> {
        let image = self.load(source)?;
        let aspect = image.aspect_ratio();

        let (width, height) = match (frame.width, frame.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w * aspect),
            (None, Some(h)) if aspect > 0.0 => (h / aspect, h),
            (None, Some(h)) => (frame.available_width, h),
            (None, None) => {
                let w = (image.width_px as f64).min(frame.available_width);
                (w, w * aspect)
            }
        };

        let slack = (frame.available_width - width).max(0.0);
        let x = match frame.align {
            TextAlign::Left => frame.x,
            TextAlign::Center => frame.x + slack / 2.0,
            TextAlign::Right => frame.x + slack,
        };

        self.push(LayoutElement {
            x,
            y: frame.y,
            width,
            height,
            draw: DrawCommand::Image { image },
        });
        Ok(height)
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.push(LayoutElement {
            x,
            y,
            width,
            height,
            draw: DrawCommand::Rect { background: color },
        });
    }

    fn add_page(&mut self) {
        if self.measuring {
            return;
        }
        self.pages
            .push(LayoutPage::new(self.page_width, self.page_height));
        self.current = self.pages.len() - 1;
        self.layer = Layer::Body;
    }

    fn switch_to_page(&mut self, index: usize) -> Result<(), FolioError> {
        if index >= self.pages.len() {
            return Err(FolioError::Backend(format!(
                "cannot switch to page {}: only {} page(s) buffered",
                index,
                self.pages.len()
            )));
        }
        self.current = index;
        self.layer = Layer::Body;
        Ok(())
    }

    fn current_page(&self) -> usize {
        self.current
    }

    fn buffered_page_count(&self) -> usize {
        self.pages.len()
    }

    fn begin_layer(&mut self, layer: Layer) {
        self.layer = layer;
        if layer == Layer::Body {
            return;
        }
        if let Some(page) = self.pages.get_mut(self.current) {
            page.layer_mut(layer).clear();
        }
    }
}

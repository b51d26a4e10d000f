//! # Layout Engine
//!
//! The flow algorithm that turns a content tree into pages.
//!
//! Layout is page-aware from the start: before placing a node the engine
//! estimates its height and, if it would cross the page's bottom limit,
//! breaks to a new page first. There is no infinite canvas that gets sliced
//! afterwards.
//!
//! A run has three passes:
//!
//! 1. **Reservation.** Header and footer bands are measured once against a
//!    measurement-only canvas; their heights (plus clearance) are reserved at
//!    the top and bottom of every page. See [`bands`].
//! 2. **Body flow.** [`Flow::layout`] walks the body depth-first with an
//!    explicit [`LayoutCursor`], dispatching on the node variant. Each
//!    recursive step receives a cursor and returns the cursor it ended with.
//! 3. **Finalization.** Every buffered page gets its bands stamped at fixed
//!    offsets. Stamping replaces a page's band layers, so pages stamped at
//!    break time come out identical to the rest.
//!
//! Node-level failures (an image that cannot be loaded, a text box with no
//! width) never abort the run: the node is replaced by a visible
//! `[Error processing content]` marker and its siblings carry on.

pub mod bands;
pub mod page_break;

use std::rc::Rc;
use std::slice;
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::backend::{Canvas, ImageFrame, Layer, RenderBackend};
use crate::error::{FolioError, NodeError};
use crate::image_loader::LoadedImage;
use crate::model::{Container, ContentNode, Document, ImageNode, TextNode};
use crate::style::{Color, FontName, TextAlign};

pub use bands::ReservedHeights;
use page_break::{decide_break, BreakDecision};

/// Horizontal gap between row children.
pub const ROW_GAP: f64 = 15.0;
/// Vertical gap after each column child.
pub const COLUMN_GAP: f64 = 10.0;
/// Space after body text.
pub const TEXT_GAP: f64 = 8.0;
/// Space after a heading.
pub const HEADING_GAP: f64 = 15.0;
/// Space before a heading.
pub const HEADING_LEAD: f64 = 10.0;
/// Text at or above this size is a heading.
pub const HEADING_THRESHOLD: f64 = 18.0;
/// Space after an image.
pub const IMAGE_GAP: f64 = 10.0;
/// Assumed height of images and containers that declare none.
pub const FALLBACK_HEIGHT: f64 = 100.0;
/// Added below a measured header and above a measured footer.
pub const BAND_CLEARANCE: f64 = 20.0;
/// Kept free above the footer reservation.
pub const PAGE_SAFETY_MARGIN: f64 = 30.0;
/// Vertical space taken by an error marker.
pub const ERROR_ADVANCE: f64 = 20.0;
/// Centered text is wrapped to this fraction of the available width.
pub const CENTERED_WIDTH_FACTOR: f64 = 0.8;
pub const ERROR_PLACEHOLDER: &str = "[Error processing content]";

// ── Output ──────────────────────────────────────────────────────

/// A page of positioned draw commands.
#[derive(Debug, Clone)]
pub struct LayoutPage {
    pub width: f64,
    pub height: f64,
    /// Header band, drawn before the body.
    pub header: Vec<LayoutElement>,
    pub elements: Vec<LayoutElement>,
    /// Footer band, drawn after the body.
    pub footer: Vec<LayoutElement>,
}

impl LayoutPage {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            header: Vec::new(),
            elements: Vec::new(),
            footer: Vec::new(),
        }
    }

    pub(crate) fn layer_mut(&mut self, layer: Layer) -> &mut Vec<LayoutElement> {
        match layer {
            Layer::Header => &mut self.header,
            Layer::Body => &mut self.elements,
            Layer::Footer => &mut self.footer,
        }
    }

    /// Every element in paint order: header, body, footer.
    pub fn paint_order(&self) -> impl Iterator<Item = &LayoutElement> {
        self.header
            .iter()
            .chain(self.elements.iter())
            .chain(self.footer.iter())
    }
}

/// A positioned element on a page.
#[derive(Debug, Clone)]
pub struct LayoutElement {
    /// Absolute position on the page (top-left corner, y down).
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub draw: DrawCommand,
}

impl LayoutElement {
    /// The element's text with lines joined by spaces, if it is text.
    pub fn text(&self) -> Option<String> {
        match &self.draw {
            DrawCommand::Text { lines, .. } => Some(
                lines
                    .iter()
                    .map(|l| l.text.trim_end())
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// A filled background rectangle.
    Rect { background: Color },
    /// Wrapped text in one face, size and color.
    Text {
        lines: Vec<TextLine>,
        font: FontName,
        font_size: f64,
        color: Color,
    },
    /// An image scaled into the element's box.
    Image { image: Rc<LoadedImage> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub x: f64,
    /// Baseline position.
    pub y: f64,
    pub text: String,
    pub width: f64,
}

// ── Configuration ───────────────────────────────────────────────

/// What happens when a row would cross the bottom of the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowBreakPolicy {
    /// Measure the whole row first and move it to the next page if it
    /// does not fit. Its children never break.
    #[default]
    KeepTogether,
    /// Each child breaks on its own. Earlier siblings stay on the prior
    /// page and the row continues from the last page reached.
    SplitChildren,
}

impl FromStr for RowBreakPolicy {
    type Err = String;

    /// Parses the same kebab-case names the JSON form uses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_string())).map_err(|_| {
            format!(
                "unknown row break policy '{}' (expected keep-together or split-children)",
                s
            )
        })
    }
}

/// Engine policy knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub row_break_policy: RowBreakPolicy,
}

impl LayoutConfig {
    pub fn with_row_break_policy(mut self, policy: RowBreakPolicy) -> Self {
        self.row_break_policy = policy;
        self
    }
}

// ── Flow state ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowMode {
    /// The body: breaks to a new page when a node would overflow.
    Main,
    /// A header or footer band: never breaks.
    Band,
    /// Children of a kept-together row: placed where they fall.
    Held,
}

/// Options shared by every recursive step of one flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowOptions {
    pub mode: FlowMode,
    pub reserved: ReservedHeights,
    pub config: LayoutConfig,
}

impl FlowOptions {
    pub fn main(reserved: ReservedHeights, config: LayoutConfig) -> Self {
        Self {
            mode: FlowMode::Main,
            reserved,
            config,
        }
    }

    pub fn band(config: LayoutConfig) -> Self {
        Self {
            mode: FlowMode::Band,
            reserved: ReservedHeights::default(),
            config,
        }
    }
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self::main(ReservedHeights::default(), LayoutConfig::default())
    }
}

/// Where the next node goes and how far down the page it may reach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    pub x: f64,
    pub y: f64,
    pub available_width: f64,
    pub page_bottom_limit: f64,
}

impl LayoutCursor {
    pub fn new(x: f64, y: f64, available_width: f64, page_bottom_limit: f64) -> Self {
        Self {
            x,
            y,
            available_width,
            page_bottom_limit,
        }
    }

    /// The cursor at the top of a body page.
    pub fn body_start<B: RenderBackend>(backend: &B, reserved: ReservedHeights) -> Self {
        let m = backend.margins();
        Self {
            x: m.left,
            y: m.top + reserved.header,
            available_width: backend.page_width() - m.horizontal(),
            page_bottom_limit: backend.page_height()
                - m.bottom
                - reserved.footer
                - PAGE_SAFETY_MARGIN,
        }
    }

    pub fn remaining_height(&self) -> f64 {
        self.page_bottom_limit - self.y
    }
}

/// Result of laying out a node sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowOutcome {
    /// Cursor after the last node, trailing gap included.
    pub cursor: LayoutCursor,
    /// Largest cursor y reached on the final page.
    pub max_y: f64,
    /// Lowest drawn edge on the final page, trailing gaps excluded.
    pub content_bottom: f64,
}

/// Where a single node ended up.
#[derive(Debug, Clone, Copy)]
struct Placement {
    bottom: f64,
    next_y: f64,
}

// ── Engine ──────────────────────────────────────────────────────

/// Runs the three layout passes for a document.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Lay out a validated document into pages.
    pub fn layout(&self, document: &Document) -> Result<Vec<LayoutPage>, FolioError> {
        let reserved = bands::reserve(document, &self.config)?;
        let options = FlowOptions::main(reserved, self.config);

        let mut canvas = Canvas::new(&document.geometry);
        let start = LayoutCursor::body_start(&canvas, reserved);
        let outcome = Flow::new(&mut canvas, document, options).layout(&document.body, start)?;
        debug!(
            "body flow finished on page {} at y={:.1}",
            canvas.current_page() + 1,
            outcome.cursor.y
        );

        bands::finalize_pages(&mut canvas, document, options)?;
        Ok(canvas.into_pages())
    }
}

/// One flow over a backend. Nested rows and columns recurse through the
/// same `Flow`, so page state is shared across the whole tree.
pub struct Flow<'a, B: RenderBackend> {
    backend: &'a mut B,
    document: &'a Document,
    options: FlowOptions,
    page_has_content: bool,
}

impl<'a, B: RenderBackend> Flow<'a, B> {
    pub fn new(backend: &'a mut B, document: &'a Document, options: FlowOptions) -> Self {
        Self {
            backend,
            document,
            options,
            page_has_content: false,
        }
    }

    /// Lay out `nodes` in order starting at `start`.
    pub fn layout(
        &mut self,
        nodes: &[ContentNode],
        start: LayoutCursor,
    ) -> Result<FlowOutcome, FolioError> {
        let mut cursor = start;
        let mut max_y = cursor.y;
        let mut content_bottom = cursor.y;

        for node in nodes {
            if self.breaks_allowed() {
                let needed = self.estimate_height(node, &cursor)?;
                let decision =
                    decide_break(cursor.remaining_height(), needed, self.page_has_content);
                if decision == BreakDecision::MoveToNextPage {
                    self.break_page(&mut cursor)?;
                    max_y = cursor.y;
                    content_bottom = cursor.y;
                }
            }

            let page_before = self.backend.current_page();
            let placed = self.place(node, &cursor)?;
            if self.backend.current_page() != page_before {
                max_y = placed.next_y;
                content_bottom = placed.bottom;
            } else {
                max_y = max_y.max(placed.next_y);
                content_bottom = content_bottom.max(placed.bottom);
            }
            cursor.y = placed.next_y;
            self.page_has_content = true;
        }

        Ok(FlowOutcome {
            cursor,
            max_y,
            content_bottom,
        })
    }

    fn breaks_allowed(&self) -> bool {
        self.options.mode == FlowMode::Main && !self.backend.is_measuring()
    }

    /// Height a node is expected to need before it is placed.
    fn estimate_height(
        &mut self,
        node: &ContentNode,
        cursor: &LayoutCursor,
    ) -> Result<f64, FolioError> {
        let keep_rows = self.options.config.row_break_policy == RowBreakPolicy::KeepTogether;
        Ok(match node {
            ContentNode::Text(text) => {
                let (_, width) = text_box(text, cursor);
                self.backend.set_font(text.font);
                self.backend.set_font_size(text.size);
                let lead = if text.size >= HEADING_THRESHOLD {
                    HEADING_LEAD
                } else {
                    0.0
                };
                lead + self
                    .backend
                    .measure_text_height(&text.text, width, text.align, text.line_gap)
            }
            ContentNode::Row(row) if keep_rows => self
                .measure_detached(node, cursor)?
                .max(row.height.unwrap_or(0.0)),
            other => other.declared_height().unwrap_or(FALLBACK_HEIGHT),
        })
    }

    /// Lay `node` out on a measurement-only canvas and report the height
    /// of what it drew.
    fn measure_detached(
        &self,
        node: &ContentNode,
        cursor: &LayoutCursor,
    ) -> Result<f64, FolioError> {
        let mut probe = Canvas::measuring(&self.document.geometry);
        let options = FlowOptions {
            mode: FlowMode::Band,
            ..self.options
        };
        let start = LayoutCursor::new(cursor.x, 0.0, cursor.available_width, f64::INFINITY);
        let outcome =
            Flow::new(&mut probe, self.document, options).layout(slice::from_ref(node), start)?;
        Ok(outcome.content_bottom)
    }

    fn break_page(&mut self, cursor: &mut LayoutCursor) -> Result<(), FolioError> {
        self.backend.add_page();
        debug!(
            "page break at y={:.1}, continuing on page {}",
            cursor.y,
            self.backend.current_page() + 1
        );
        bands::stamp_current_page(&mut *self.backend, self.document, self.options)?;
        cursor.y = self.backend.margins().top + self.options.reserved.header;
        self.page_has_content = false;
        Ok(())
    }

    fn place(&mut self, node: &ContentNode, cursor: &LayoutCursor) -> Result<Placement, FolioError> {
        let placed = match node {
            ContentNode::Text(text) => self.place_text(text, cursor),
            ContentNode::Image(image) => self.place_image(image, cursor),
            ContentNode::Row(row) => Ok(self.place_row(row, cursor)?),
            ContentNode::Column(column) => Ok(self.place_column(column, cursor)?),
        };

        Ok(match placed {
            Ok(placement) => placement,
            Err(e) => {
                warn!(
                    "{} node at ({:.1}, {:.1}) replaced by error marker: {}",
                    node.kind_name(),
                    cursor.x,
                    cursor.y,
                    e
                );
                self.place_error_marker(cursor)
            }
        })
    }

    fn place_text(&mut self, text: &TextNode, cursor: &LayoutCursor) -> Result<Placement, NodeError> {
        let (x, width) = text_box(text, cursor);
        let heading = text.size >= HEADING_THRESHOLD;
        let y = if heading {
            cursor.y + HEADING_LEAD
        } else {
            cursor.y
        };

        self.backend.set_font(text.font);
        self.backend.set_font_size(text.size);
        self.backend.set_fill_color(text.color);

        if let Some(background) = text.background_color {
            let height =
                self.backend
                    .measure_text_height(&text.text, width, text.align, text.line_gap);
            self.backend.fill_rect(x, y, width, height, background);
        }

        let drawn = self
            .backend
            .draw_text(&text.text, x, y, width, text.align, text.line_gap);
        self.reset_text_state();

        let bottom = drawn?;
        let gap = if heading { HEADING_GAP } else { TEXT_GAP };
        Ok(Placement {
            bottom,
            next_y: bottom + gap,
        })
    }

    fn place_image(&mut self, image: &ImageNode, cursor: &LayoutCursor) -> Result<Placement, NodeError> {
        if let Some(background) = image.background_color {
            self.backend.fill_rect(
                cursor.x,
                cursor.y,
                image.width.unwrap_or(cursor.available_width),
                image.height.unwrap_or(FALLBACK_HEIGHT),
                background,
            );
        }

        let frame = ImageFrame {
            x: cursor.x,
            y: cursor.y,
            available_width: cursor.available_width,
            width: image.width,
            height: image.height,
            align: image.align,
        };
        let height = self.backend.draw_image(&image.source, frame)?;
        let bottom = cursor.y + height;
        Ok(Placement {
            bottom,
            next_y: bottom + IMAGE_GAP,
        })
    }

    fn place_row(&mut self, row: &Container, cursor: &LayoutCursor) -> Result<Placement, FolioError> {
        self.fill_container_background(row, cursor);

        let count = row.children.len();
        if count == 0 {
            return Ok(Placement {
                bottom: cursor.y,
                next_y: cursor.y,
            });
        }
        let child_width = row_child_width(cursor.available_width, count);
        let start_page = self.backend.current_page();

        let outer_mode = self.options.mode;
        if outer_mode == FlowMode::Main
            && self.options.config.row_break_policy == RowBreakPolicy::KeepTogether
        {
            self.options.mode = FlowMode::Held;
        }
        let result = self.place_row_children(&row.children, cursor, child_width);
        self.options.mode = outer_mode;

        let bottom = self.declared_bottom(row, cursor, start_page, result?);
        Ok(Placement {
            bottom,
            next_y: bottom + ROW_GAP,
        })
    }

    /// Lay out row children side by side, all starting at the row's y.
    /// Returns the lowest content edge on the last page reached.
    fn place_row_children(
        &mut self,
        children: &[ContentNode],
        cursor: &LayoutCursor,
        child_width: f64,
    ) -> Result<f64, FolioError> {
        let mut bottom = cursor.y;
        let mut last_page = self.backend.current_page();

        for (i, child) in children.iter().enumerate() {
            let child_cursor = LayoutCursor {
                x: cursor.x + i as f64 * (child_width + ROW_GAP),
                available_width: child_width,
                ..*cursor
            };
            let outcome = self.layout(slice::from_ref(child), child_cursor)?;

            let page = self.backend.current_page();
            if page != last_page {
                last_page = page;
                bottom = outcome.content_bottom;
            } else {
                bottom = bottom.max(outcome.content_bottom);
            }
        }

        Ok(bottom)
    }

    fn place_column(
        &mut self,
        column: &Container,
        cursor: &LayoutCursor,
    ) -> Result<Placement, FolioError> {
        self.fill_container_background(column, cursor);
        let start_page = self.backend.current_page();

        let mut y = cursor.y;
        let mut bottom = cursor.y;
        for child in &column.children {
            let page_before = self.backend.current_page();
            let outcome = self.layout(slice::from_ref(child), LayoutCursor { y, ..*cursor })?;
            if self.backend.current_page() != page_before {
                bottom = outcome.content_bottom;
            } else {
                bottom = bottom.max(outcome.content_bottom);
            }
            y = outcome.cursor.y + COLUMN_GAP;
        }

        let declared = self.declared_bottom(column, cursor, start_page, bottom);
        if declared > bottom {
            y = y.max(declared + COLUMN_GAP);
        }
        Ok(Placement {
            bottom: declared,
            next_y: y,
        })
    }

    /// A declared container height holds its space on the page where the
    /// container started, even when the children end higher.
    fn declared_bottom(
        &self,
        container: &Container,
        cursor: &LayoutCursor,
        start_page: usize,
        content_bottom: f64,
    ) -> f64 {
        match container.height {
            Some(height) if self.backend.current_page() == start_page => {
                content_bottom.max(cursor.y + height)
            }
            _ => content_bottom,
        }
    }

    fn fill_container_background(&mut self, container: &Container, cursor: &LayoutCursor) {
        if let Some(background) = container.background_color {
            self.backend.fill_rect(
                cursor.x,
                cursor.y,
                cursor.available_width,
                container.height.unwrap_or(FALLBACK_HEIGHT),
                background,
            );
        }
    }

    fn place_error_marker(&mut self, cursor: &LayoutCursor) -> Placement {
        self.reset_text_state();
        if let Err(e) = self.backend.draw_text(
            ERROR_PLACEHOLDER,
            cursor.x,
            cursor.y,
            cursor.available_width,
            TextAlign::Left,
            0.0,
        ) {
            debug!("error marker not drawn: {}", e);
        }
        let bottom = cursor.y + ERROR_ADVANCE;
        Placement {
            bottom,
            next_y: bottom,
        }
    }

    fn reset_text_state(&mut self) {
        self.backend.set_font(FontName::Helvetica);
        self.backend.set_font_size(12.0);
        self.backend.set_fill_color(Color::BLACK);
    }
}

/// Width of each of `count` equal row children.
pub fn row_child_width(available_width: f64, count: usize) -> f64 {
    if count == 0 {
        return available_width;
    }
    (available_width - ROW_GAP * (count - 1) as f64) / count as f64
}

/// The x and wrap width of a text node's box.
fn text_box(text: &TextNode, cursor: &LayoutCursor) -> (f64, f64) {
    let available = cursor.available_width;
    let width = text.width.map_or(available, |w| w.min(available));
    match text.align {
        TextAlign::Center => {
            let narrowed = width * CENTERED_WIDTH_FACTOR;
            (cursor.x + (available - narrowed) / 2.0, narrowed)
        }
        TextAlign::Left | TextAlign::Right => (cursor.x, width),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PageGeometry, TextNode};

    const LINE: f64 = 13.872 + 2.0;

    fn png_data_uri() -> String {
        use base64::Engine;
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 255, 255]));
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), 2, 2, image::ColorType::Rgba8)
            .unwrap();
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(buf)
        )
    }

    fn run(nodes: Vec<ContentNode>) -> (Vec<LayoutPage>, FlowOutcome) {
        let doc = Document::new(PageGeometry::default(), nodes);
        let mut canvas = Canvas::new(&doc.geometry);
        let start = LayoutCursor::body_start(&canvas, ReservedHeights::default());
        let outcome = Flow::new(&mut canvas, &doc, FlowOptions::default())
            .layout(&doc.body, start)
            .unwrap();
        (canvas.into_pages(), outcome)
    }

    #[test]
    fn text_advances_by_height_plus_gap() {
        let (pages, outcome) = run(vec![ContentNode::text("Hi", 12.0)]);
        assert_eq!(pages.len(), 1);
        assert!((outcome.cursor.y - (72.0 + LINE + TEXT_GAP)).abs() < 1e-9);
        assert!((outcome.content_bottom - (72.0 + LINE)).abs() < 1e-9);
    }

    #[test]
    fn heading_gets_lead_and_larger_gap() {
        let (pages, outcome) = run(vec![ContentNode::text("Title", 24.0)]);
        let el = &pages[0].elements[0];
        assert!((el.y - (72.0 + HEADING_LEAD)).abs() < 1e-9);
        let expected = el.y + el.height + HEADING_GAP;
        assert!((outcome.cursor.y - expected).abs() < 1e-9);
    }

    #[test]
    fn centered_text_uses_narrowed_box() {
        let (pages, _) = run(vec![ContentNode::Text(TextNode {
            text: "Centered".into(),
            align: TextAlign::Center,
            ..Default::default()
        })]);
        let el = &pages[0].elements[0];
        let available = 595.28 - 144.0;
        assert!((el.width - available * 0.8).abs() < 1e-9);
        assert!((el.x - (72.0 + available * 0.1)).abs() < 1e-9);
    }

    #[test]
    fn text_width_narrows_box() {
        let (pages, _) = run(vec![ContentNode::Text(TextNode {
            text: "Narrow".into(),
            width: Some(120.0),
            ..Default::default()
        })]);
        assert_eq!(pages[0].elements[0].width, 120.0);
    }

    #[test]
    fn row_children_share_width() {
        let w = row_child_width(300.0, 3);
        assert!((w - 90.0).abs() < 1e-9);
        assert_eq!(row_child_width(300.0, 1), 300.0);
    }

    #[test]
    fn row_advances_by_tallest_child_plus_gap() {
        let src = png_data_uri();
        let (_, outcome) = run(vec![ContentNode::row(vec![
            ContentNode::image(&src, Some(20.0), Some(50.0)),
            ContentNode::image(&src, Some(20.0), Some(80.0)),
            ContentNode::image(&src, Some(20.0), Some(30.0)),
        ])]);
        assert!((outcome.cursor.y - (72.0 + 80.0 + ROW_GAP)).abs() < 1e-9);
    }

    #[test]
    fn row_of_declared_height_columns_advances_by_tallest() {
        let column = |height: f64| {
            let mut c = Container::new(vec![]);
            c.height = Some(height);
            c.background_color = Color::parse("#eeeeee");
            ContentNode::Column(c)
        };
        let (pages, outcome) = run(vec![
            ContentNode::row(vec![column(50.0), column(80.0), column(30.0)]),
            ContentNode::text("after", 12.0),
        ]);
        assert!((outcome.content_bottom - (72.0 + 80.0 + ROW_GAP + LINE)).abs() < 1e-9);
        let after = pages[0]
            .elements
            .iter()
            .find(|e| e.text().as_deref() == Some("after"))
            .unwrap();
        assert!((after.y - (72.0 + 80.0 + ROW_GAP)).abs() < 1e-9);
    }

    #[test]
    fn column_reserves_declared_height() {
        let mut column = Container::new(vec![ContentNode::text("short", 12.0)]);
        column.height = Some(120.0);
        let (_, outcome) = run(vec![ContentNode::Column(column)]);
        assert!((outcome.content_bottom - (72.0 + 120.0)).abs() < 1e-9);
        assert!((outcome.cursor.y - (72.0 + 120.0 + COLUMN_GAP)).abs() < 1e-9);
    }

    #[test]
    fn row_children_x_strictly_increasing() {
        let (pages, _) = run(vec![ContentNode::row(vec![
            ContentNode::text("a", 12.0),
            ContentNode::text("b", 12.0),
            ContentNode::text("c", 12.0),
        ])]);
        let xs: Vec<f64> = pages[0].elements.iter().map(|e| e.x).collect();
        let w = row_child_width(595.28 - 144.0, 3);
        for pair in xs.windows(2) {
            assert!((pair[1] - pair[0] - (w + ROW_GAP)).abs() < 1e-9);
        }
    }

    #[test]
    fn empty_row_does_not_advance() {
        let mut row = Container::new(vec![]);
        row.background_color = Color::parse("#e6e6e6");
        let (pages, outcome) = run(vec![ContentNode::Row(row)]);
        assert_eq!(outcome.cursor.y, 72.0);
        assert!(matches!(pages[0].elements[0].draw, DrawCommand::Rect { .. }));
    }

    #[test]
    fn column_stacks_children_with_gap() {
        let (pages, outcome) = run(vec![ContentNode::column(vec![
            ContentNode::text("one", 12.0),
            ContentNode::text("two", 12.0),
        ])]);
        let ys: Vec<f64> = pages[0].elements.iter().map(|e| e.y).collect();
        assert!((ys[1] - (ys[0] + LINE + TEXT_GAP + COLUMN_GAP)).abs() < 1e-9);
        assert!((outcome.cursor.y - (ys[1] + LINE + TEXT_GAP + COLUMN_GAP)).abs() < 1e-9);
    }

    #[test]
    fn failed_image_becomes_marker_and_siblings_continue() {
        let (pages, outcome) = run(vec![
            ContentNode::image("https://example.com/missing.png", Some(100.0), Some(100.0)),
            ContentNode::text("after", 12.0),
        ]);
        let texts: Vec<String> = pages[0].elements.iter().filter_map(|e| e.text()).collect();
        assert_eq!(texts, vec![ERROR_PLACEHOLDER.to_string(), "after".to_string()]);
        let after = &pages[0].elements[1];
        assert!((after.y - (72.0 + ERROR_ADVANCE)).abs() < 1e-9);
        assert!(outcome.cursor.y > after.y);
    }

    #[test]
    fn overflowing_body_breaks_pages() {
        let nodes = (0..80).map(|i| ContentNode::text(&format!("Line {}", i), 12.0)).collect();
        let (pages, _) = run(nodes);
        assert!(pages.len() > 1);
        for page in &pages {
            for el in &page.elements {
                assert!(el.y + el.height <= 841.89 - 72.0 - PAGE_SAFETY_MARGIN + 1e-9);
            }
        }
    }

    #[test]
    fn oversized_first_node_does_not_leave_blank_page() {
        let src = png_data_uri();
        let (pages, _) = run(vec![ContentNode::image(&src, Some(100.0), Some(2000.0))]);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].elements.len(), 1);
    }

    #[test]
    fn config_deserializes_kebab_case_policy() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{ "rowBreakPolicy": "split-children" }"#).unwrap();
        assert_eq!(config.row_break_policy, RowBreakPolicy::SplitChildren);
        let default: LayoutConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(default.row_break_policy, RowBreakPolicy::KeepTogether);
    }

    #[test]
    fn row_break_policy_parses_kebab_names() {
        assert_eq!(
            "split-children".parse::<RowBreakPolicy>(),
            Ok(RowBreakPolicy::SplitChildren)
        );
        assert_eq!(
            "keep-together".parse::<RowBreakPolicy>(),
            Ok(RowBreakPolicy::KeepTogether)
        );
        assert!("sideways".parse::<RowBreakPolicy>().is_err());
    }
}

//! # Document Model
//!
//! The input representation for the engine. A document is page geometry plus
//! three sequences of content nodes: an optional header band, the body, and
//! an optional footer band. Each content node is one of four variants (text,
//! image, row, column); rows and columns nest arbitrarily.
//!
//! The JSON shape follows the wire format clients already produce:
//!
//! ```json
//! {
//!   "page": "a4",
//!   "orientation": "portrait",
//!   "margins": { "top": 1, "bottom": 1, "left": 1, "right": 1 },
//!   "header": { "content": [ { "type": "text", "content": "ACME" } ] },
//!   "content": [ { "type": "row", "childs": [ ... ] } ],
//!   "footer": { "content": [ ... ] }
//! }
//! ```
//!
//! Unknown fields are rejected at every level.

mod validate;

use crate::style::{Color, FontName, TextAlign};
use serde::{Deserialize, Serialize};

/// Points per inch. Margins arrive in inches.
pub const POINTS_PER_INCH: f64 = 72.0;

/// A complete document ready for layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DocumentDef", into = "DocumentDef")]
pub struct Document {
    pub geometry: PageGeometry,
    /// Repeated at the top of every page. Empty when absent.
    pub header: Vec<ContentNode>,
    pub body: Vec<ContentNode>,
    /// Repeated at the bottom of every page. Empty when absent.
    pub footer: Vec<ContentNode>,
}

impl Document {
    pub fn new(geometry: PageGeometry, body: Vec<ContentNode>) -> Self {
        Self {
            geometry,
            header: Vec::new(),
            body,
            footer: Vec::new(),
        }
    }

    pub fn with_header(mut self, header: Vec<ContentNode>) -> Self {
        self.header = header;
        self
    }

    pub fn with_footer(mut self, footer: Vec<ContentNode>) -> Self {
        self.footer = footer;
        self
    }
}

/// Wire shape of a [`Document`]: geometry fields live at the root and bands
/// are wrapped in `{ "content": [...] }`.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocumentDef {
    margins: Margins,
    orientation: Orientation,
    page: PageSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    header: Option<Band>,
    content: Vec<ContentNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    footer: Option<Band>,
}

/// A header or footer band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Band {
    pub content: Vec<ContentNode>,
}

impl From<DocumentDef> for Document {
    fn from(def: DocumentDef) -> Self {
        Self {
            geometry: PageGeometry {
                page_size: def.page,
                orientation: def.orientation,
                margins: def.margins,
            },
            header: def.header.map(|b| b.content).unwrap_or_default(),
            body: def.content,
            footer: def.footer.map(|b| b.content).unwrap_or_default(),
        }
    }
}

impl From<Document> for DocumentDef {
    fn from(doc: Document) -> Self {
        let band = |content: Vec<ContentNode>| {
            if content.is_empty() {
                None
            } else {
                Some(Band { content })
            }
        };
        Self {
            margins: doc.geometry.margins,
            orientation: doc.geometry.orientation,
            page: doc.geometry.page_size,
            header: band(doc.header),
            content: doc.body,
            footer: band(doc.footer),
        }
    }
}

// ── Geometry ────────────────────────────────────────────────────

/// Page size, orientation and margins.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PageGeometry {
    pub page_size: PageSize,
    pub orientation: Orientation,
    pub margins: Margins,
}

impl PageGeometry {
    pub fn new(page_size: PageSize, orientation: Orientation, margins: Margins) -> Self {
        Self {
            page_size,
            orientation,
            margins,
        }
    }

    /// Returns (width, height) in points, honoring orientation.
    pub fn dimensions(&self) -> (f64, f64) {
        let (w, h) = self.page_size.dimensions();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    /// Margins converted to points.
    pub fn margins_pt(&self) -> Edges {
        self.margins.to_points()
    }

    /// The drawable area inside the margins, in points.
    pub fn content_rect(&self) -> Rect {
        let (w, h) = self.dimensions();
        let m = self.margins_pt();
        Rect {
            x: m.left,
            y: m.top,
            width: w - m.horizontal(),
            height: h - m.vertical(),
        }
    }
}

/// Standard page sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
}

impl PageSize {
    /// Returns portrait (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page margins in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Margins {
    pub fn uniform(inches: f64) -> Self {
        Self {
            top: inches,
            bottom: inches,
            left: inches,
            right: inches,
        }
    }

    pub fn to_points(&self) -> Edges {
        Edges {
            top: self.top * POINTS_PER_INCH,
            right: self.right * POINTS_PER_INCH,
            bottom: self.bottom * POINTS_PER_INCH,
            left: self.left * POINTS_PER_INCH,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

/// Edge values (top, right, bottom, left) in points.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// An axis-aligned rectangle in page space (origin top-left, y down).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

// ── Content nodes ───────────────────────────────────────────────

/// A node in the content tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentNode {
    Text(TextNode),
    Image(ImageNode),
    /// Children side by side, sharing the row's width.
    Row(Container),
    /// Children stacked top to bottom at full width.
    Column(Container),
}

impl ContentNode {
    /// A left-aligned Helvetica text node.
    pub fn text(content: &str, size: f64) -> Self {
        ContentNode::Text(TextNode {
            text: content.to_string(),
            size,
            ..Default::default()
        })
    }

    pub fn image(source: &str, width: Option<f64>, height: Option<f64>) -> Self {
        ContentNode::Image(ImageNode {
            source: source.to_string(),
            width,
            height,
            ..Default::default()
        })
    }

    pub fn row(children: Vec<ContentNode>) -> Self {
        ContentNode::Row(Container::new(children))
    }

    pub fn column(children: Vec<ContentNode>) -> Self {
        ContentNode::Column(Container::new(children))
    }

    /// Human-readable variant name, used in logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ContentNode::Text(_) => "text",
            ContentNode::Image(_) => "image",
            ContentNode::Row(_) => "row",
            ContentNode::Column(_) => "column",
        }
    }

    /// The declared height, if the variant carries one.
    pub fn declared_height(&self) -> Option<f64> {
        match self {
            ContentNode::Text(t) => t.height,
            ContentNode::Image(i) => i.height,
            ContentNode::Row(c) | ContentNode::Column(c) => c.height,
        }
    }
}

fn default_font_size() -> f64 {
    12.0
}

fn default_line_gap() -> f64 {
    2.0
}

/// A run of wrapped text drawn in a single face, size and color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TextNode {
    #[serde(rename = "content", default)]
    pub text: String,
    #[serde(default)]
    pub font: FontName,
    #[serde(default = "default_font_size")]
    pub size: f64,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default)]
    pub color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    /// Extra space between wrapped lines, in points.
    #[serde(default = "default_line_gap")]
    pub line_gap: f64,
    /// Narrows the text box when smaller than the available width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl Default for TextNode {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: FontName::Helvetica,
            size: default_font_size(),
            align: TextAlign::Left,
            color: Color::BLACK,
            background_color: None,
            line_gap: default_line_gap(),
            width: None,
            height: None,
        }
    }
}

/// An image drawn from a data URI, file path or raw base64.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImageNode {
    #[serde(rename = "content")]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
}

/// Shared shape of rows and columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Container {
    #[serde(rename = "childs", alias = "children", default)]
    pub children: Vec<ContentNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    /// Height of the background fill and of the page-break estimate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl Container {
    pub fn new(children: Vec<ContentNode>) -> Self {
        Self {
            children,
            background_color: None,
            height: None,
        }
    }
}

//! # folio
//!
//! A paginated flow-layout engine for JSON-described documents.
//!
//! A document is a tree of text, image, row and column nodes, plus optional
//! header and footer bands. folio flows the tree onto fixed-size pages:
//! every node is measured against the space left on the current page before
//! it is placed, and a node that would cross the bottom limit starts a new
//! page. Header and footer heights are measured once, reserved on every page,
//! and stamped onto each page at identical offsets.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON)
//!       ↓
//!   [model]    Document tree, geometry, validation
//!       ↓
//!   [layout]   Reservation pass, body flow, band finalization
//!       ↓
//!   [backend]  Measure + draw + page management (recording canvas)
//!       ↓
//!   [pdf]      Serialize to PDF bytes
//! ```

pub mod backend;
pub mod error;
pub mod font;
pub mod image_loader;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod schema;
pub mod style;
pub mod text;

pub use error::{FolioError, NodeError};
pub use layout::{LayoutConfig, LayoutPage, RowBreakPolicy};
pub use model::Document;

use layout::LayoutEngine;
use pdf::PdfWriter;

/// A finished PDF and its page count.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl Artifact {
    /// Byte length of the PDF.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Render a document to PDF bytes with the default layout policy.
///
/// This is the primary entry point.
pub fn render(document: &Document) -> Result<Vec<u8>, FolioError> {
    Ok(render_with(document, &LayoutConfig::default())?.bytes)
}

/// Render a document to PDF with an explicit layout policy.
pub fn render_with(document: &Document, config: &LayoutConfig) -> Result<Artifact, FolioError> {
    let pages = layout_document(document, config)?;
    let bytes = PdfWriter::new().write(&pages)?;
    Ok(Artifact {
        bytes,
        page_count: pages.len(),
    })
}

/// Render a document described as JSON to PDF bytes.
pub fn render_json(json: &str) -> Result<Vec<u8>, FolioError> {
    let document = parse_document(json)?;
    render(&document)
}

/// Parse and validate a JSON document.
pub fn parse_document(json: &str) -> Result<Document, FolioError> {
    let document: Document = serde_json::from_str(json)?;
    document.validate()?;
    Ok(document)
}

/// Lay a document out into pages without serializing them.
pub fn layout_document(
    document: &Document,
    config: &LayoutConfig,
) -> Result<Vec<LayoutPage>, FolioError> {
    document.validate()?;
    LayoutEngine::new(*config).layout(document)
}

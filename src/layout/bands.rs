//! # Header and Footer Bands
//!
//! Bands are measured once per document on a measurement-only canvas and
//! their heights are reserved on every page. After the body flow, each
//! buffered page is revisited and its bands are stamped at fixed offsets:
//! the header at the top margin, the footer at
//! `page height - bottom margin - footer reservation`.

use log::debug;

use super::{Flow, FlowMode, FlowOptions, LayoutConfig, LayoutCursor, BAND_CLEARANCE};
use crate::backend::{Canvas, Layer, RenderBackend};
use crate::error::FolioError;
use crate::model::{ContentNode, Document};

/// Vertical space reserved for the bands on every page. Zero for an
/// absent or empty band.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReservedHeights {
    pub header: f64,
    pub footer: f64,
}

/// Measure both bands.
pub fn reserve(document: &Document, config: &LayoutConfig) -> Result<ReservedHeights, FolioError> {
    let reserved = ReservedHeights {
        header: measure_band(&document.header, document, config)?,
        footer: measure_band(&document.footer, document, config)?,
    };
    debug!(
        "reserved {:.1}pt for header, {:.1}pt for footer",
        reserved.header, reserved.footer
    );
    Ok(reserved)
}

fn measure_band(
    nodes: &[ContentNode],
    document: &Document,
    config: &LayoutConfig,
) -> Result<f64, FolioError> {
    if nodes.is_empty() {
        return Ok(0.0);
    }

    let mut probe = Canvas::measuring(&document.geometry);
    let area = document.geometry.content_rect();
    let start = LayoutCursor::new(area.x, area.y, area.width, f64::INFINITY);
    let outcome = Flow::new(&mut probe, document, FlowOptions::band(*config)).layout(nodes, start)?;
    Ok(outcome.max_y - area.y + BAND_CLEARANCE)
}

/// y at which the footer band starts.
pub fn footer_top<B: RenderBackend>(backend: &B, reserved_footer: f64) -> f64 {
    backend.page_height() - backend.margins().bottom - reserved_footer
}

/// Stamp the header and footer onto the backend's current page, replacing
/// whatever bands it already carries.
pub fn stamp_current_page<B: RenderBackend>(
    backend: &mut B,
    document: &Document,
    options: FlowOptions,
) -> Result<(), FolioError> {
    let margins = backend.margins();
    let width = backend.page_width() - margins.horizontal();
    let band = FlowOptions {
        mode: FlowMode::Band,
        ..options
    };

    if !document.header.is_empty() {
        backend.begin_layer(Layer::Header);
        let start = LayoutCursor::new(margins.left, margins.top, width, f64::INFINITY);
        Flow::new(&mut *backend, document, band).layout(&document.header, start)?;
    }

    if !document.footer.is_empty() {
        backend.begin_layer(Layer::Footer);
        let top = footer_top(&*backend, options.reserved.footer);
        let start = LayoutCursor::new(margins.left, top, width, f64::INFINITY);
        Flow::new(&mut *backend, document, band).layout(&document.footer, start)?;
    }

    backend.begin_layer(Layer::Body);
    Ok(())
}

/// Visit every buffered page and stamp its bands.
pub fn finalize_pages<B: RenderBackend>(
    backend: &mut B,
    document: &Document,
    options: FlowOptions,
) -> Result<(), FolioError> {
    if document.header.is_empty() && document.footer.is_empty() {
        return Ok(());
    }

    let count = backend.buffered_page_count();
    for index in 0..count {
        backend.switch_to_page(index)?;
        stamp_current_page(backend, document, options)?;
    }
    debug!("stamped bands on {} page(s)", count);
    Ok(())
}
